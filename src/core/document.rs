use log::debug;

use crate::error::{Result, WriterError};

use super::{
    config::WriterConfig,
    field::Field,
    row::{Row, render_row},
};

/// The buffered content of a writer: an optional header and the data rows in
/// insertion order.
///
/// Rendering never mutates the document and reads the configuration it is
/// handed at call time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    header: Option<Row>,
    rows: Vec<Row>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> Option<&[Field]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Replaces the header.
    ///
    /// A header is exactly one row: any list field means the caller handed
    /// over several rows, which is rejected and leaves the previous header in
    /// place.
    pub fn set_header(&mut self, header: Row) -> Result<()> {
        if header.iter().any(Field::is_list) {
            return Err(WriterError::MultiRowHeader);
        }
        debug!("Header set with {} fields", header.len());
        self.header = Some(header);
        Ok(())
    }

    pub fn clear_header(&mut self) {
        self.header = None;
    }

    /// Appends a data row. Empty rows are dropped.
    pub fn add_row(&mut self, row: Row) {
        if row.is_empty() {
            debug!("Dropping empty row");
            return;
        }
        self.rows.push(row);
    }

    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    pub fn render_header(&self, config: &WriterConfig) -> String {
        match &self.header {
            Some(header) if config.write_header => {
                render_row(header, config.header_quote_mode, &config.format())
            }
            _ => String::new(),
        }
    }

    pub fn render_body(&self, config: &WriterConfig) -> String {
        let format = config.format();
        self.rows
            .iter()
            .map(|row| render_row(row, config.body_quote_mode, &format))
            .collect()
    }

    /// Header followed by body, with trailing line endings removed.
    pub fn render_all(&self, config: &WriterConfig) -> String {
        let mut text = self.render_header(config);
        text.push_str(&self.render_body(config));

        let line_ending = config.line_ending.as_str();
        if !line_ending.is_empty() {
            while text.ends_with(line_ending) {
                text.truncate(text.len() - line_ending.len());
            }
        }
        text
    }
}
