//! Configuration values for rendering and committing delimited text.
//!
//! Every mode is a closed enum. String values coming from outside the crate
//! (user input, deserialized settings) are validated through [`FromStr`], so an
//! unknown mode is rejected where it is parsed and never at render time.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::WriterError;

/// Which fields of a row get wrapped in the quote character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuoteMode {
    /// Fields are emitted as-is, never quoted or escaped.
    #[serde(rename = "quote_none")]
    None,
    /// Every field is quoted.
    #[serde(rename = "quote_all")]
    All,
    /// Numeric scalars are emitted bare, everything else is quoted.
    #[default]
    #[serde(rename = "quote_string")]
    String,
}

impl QuoteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteMode::None => "quote_none",
            QuoteMode::All => "quote_all",
            QuoteMode::String => "quote_string",
        }
    }
}

impl FromStr for QuoteMode {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quote_none" | "none" => Ok(QuoteMode::None),
            "quote_all" | "all" => Ok(QuoteMode::All),
            "quote_string" | "string" => Ok(QuoteMode::String),
            other => Err(WriterError::InvalidQuoteMode(other.to_string())),
        }
    }
}

impl fmt::Display for QuoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a literal quote character is represented inside a quoted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EscapeMode {
    /// `"` becomes `""`.
    #[default]
    #[serde(rename = "double")]
    Double,
    /// `"` becomes `\"`.
    #[serde(rename = "back_slash")]
    Backslash,
    /// Quote characters are left untouched, which can produce ambiguous output.
    #[serde(rename = "none")]
    None,
}

impl EscapeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscapeMode::Double => "double",
            EscapeMode::Backslash => "back_slash",
            EscapeMode::None => "none",
        }
    }
}

impl FromStr for EscapeMode {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "double" => Ok(EscapeMode::Double),
            "back_slash" | "backslash" => Ok(EscapeMode::Backslash),
            "none" => Ok(EscapeMode::None),
            other => Err(WriterError::InvalidEscapeMode(other.to_string())),
        }
    }
}

impl fmt::Display for EscapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a commit appends to the target file or replaces its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WriteMode {
    /// Only the body is written, after the existing bytes.
    #[serde(rename = "append")]
    Append,
    /// Existing content is discarded and header plus body are written.
    #[default]
    #[serde(rename = "truncate")]
    Truncate,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Append => "append",
            WriteMode::Truncate => "truncate",
        }
    }
}

impl FromStr for WriteMode {
    type Err = WriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(WriteMode::Append),
            "truncate" => Ok(WriteMode::Truncate),
            other => Err(WriterError::InvalidWriteMode(other.to_string())),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The textual tokens shared by every rendered field and row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format<'a> {
    pub delimiter: &'a str,
    pub quote: &'a str,
    pub line_ending: &'a str,
    pub escape: EscapeMode,
}

/// Every knob of a writer. Read at render/commit time, never snapshotted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    pub delimiter: String,
    pub quote: String,
    pub line_ending: String,
    pub header_quote_mode: QuoteMode,
    pub body_quote_mode: QuoteMode,
    pub escape_mode: EscapeMode,
    pub write_mode: WriteMode,
    pub write_header: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            delimiter: ",".to_string(),
            quote: "\"".to_string(),
            line_ending: "\n".to_string(),
            header_quote_mode: QuoteMode::default(),
            body_quote_mode: QuoteMode::default(),
            escape_mode: EscapeMode::default(),
            write_mode: WriteMode::default(),
            write_header: true,
        }
    }
}

impl WriterConfig {
    pub fn format(&self) -> Format<'_> {
        Format {
            delimiter: &self.delimiter,
            quote: &self.quote,
            line_ending: &self.line_ending,
            escape: self.escape_mode,
        }
    }
}
