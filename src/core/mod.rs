/// Quote, escape and write modes plus the writer configuration.
pub mod config;

/// The header/rows buffer and its rendering.
pub mod document;

/// Field values and the field renderer.
pub mod field;

/// Row rendering.
pub mod row;
