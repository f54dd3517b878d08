//! The writer façade: configuration, buffered rows, rendering and commits.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    core::{
        config::{EscapeMode, QuoteMode, WriteMode, WriterConfig},
        document::Document,
        field::Field,
        row::Row,
    },
    error::{Result, WriterError},
    file::{
        committer::{FileCommitter, RetryPolicy},
        path::{LexicalPathNormalizer, PathNormalizer},
    },
};

/// Buffers rows in memory and renders them as delimited text.
///
/// Setters return `&mut Self` so calls can be chained. Configuration is read
/// when text is rendered or committed, so changing the delimiter after adding
/// rows affects every row.
///
/// # Examples
///
/// ```
/// use sv_writer::{ValueWriter, core::config::QuoteMode};
///
/// let mut writer = ValueWriter::new();
/// writer
///     .set_header(["name", "age"])?
///     .add_row(["Alice", "30"])
///     .add_row(["Bob", "25"]);
///
/// assert_eq!(writer.render_all(), "\"name\",\"age\"\n\"Alice\",30\n\"Bob\",25");
///
/// writer.set_body_quote_mode(QuoteMode::None);
/// assert_eq!(writer.render_body(), "Alice,30\nBob,25\n");
/// # Ok::<(), sv_writer::WriterError>(())
/// ```
pub struct ValueWriter {
    config: WriterConfig,
    document: Document,
    path: Option<PathBuf>,
    normalizer: Box<dyn PathNormalizer>,
    committer: FileCommitter,
}

impl Default for ValueWriter {
    fn default() -> Self {
        ValueWriter::with_config(WriterConfig::default())
    }
}

impl fmt::Debug for ValueWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueWriter")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("path", &self.path)
            .field("committer", &self.committer)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ValueWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_all())
    }
}

impl ValueWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: WriterConfig) -> Self {
        ValueWriter {
            config,
            document: Document::new(),
            path: None,
            normalizer: Box::new(LexicalPathNormalizer),
            committer: FileCommitter::default(),
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: WriterConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) -> &mut Self {
        self.config.delimiter = delimiter.into();
        self
    }

    pub fn set_quote(&mut self, quote: impl Into<String>) -> &mut Self {
        self.config.quote = quote.into();
        self
    }

    pub fn set_line_ending(&mut self, line_ending: impl Into<String>) -> &mut Self {
        self.config.line_ending = line_ending.into();
        self
    }

    pub fn set_header_quote_mode(&mut self, mode: QuoteMode) -> &mut Self {
        self.config.header_quote_mode = mode;
        self
    }

    pub fn set_body_quote_mode(&mut self, mode: QuoteMode) -> &mut Self {
        self.config.body_quote_mode = mode;
        self
    }

    pub fn set_escape_mode(&mut self, mode: EscapeMode) -> &mut Self {
        self.config.escape_mode = mode;
        self
    }

    pub fn set_write_mode(&mut self, mode: WriteMode) -> &mut Self {
        self.config.write_mode = mode;
        self
    }

    /// When disabled the header is kept but never rendered.
    pub fn set_write_header(&mut self, enabled: bool) -> &mut Self {
        self.config.write_header = enabled;
        self
    }

    pub fn set_retry_policy(&mut self, policy: RetryPolicy) -> &mut Self {
        self.committer = FileCommitter::new(policy);
        self
    }

    pub fn set_normalizer(&mut self, normalizer: impl PathNormalizer + 'static) -> &mut Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Normalizes and stores the path used by [`ValueWriter::commit`].
    pub fn set_path(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let normalized = self.normalizer.normalize(path.as_ref())?;
        debug!("Target path set to {}", normalized.display());
        self.path = Some(normalized);
        Ok(self)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Replaces the header row. A header containing list fields is rejected
    /// with [`WriterError::MultiRowHeader`] and the previous header is kept.
    pub fn set_header<I, F>(&mut self, header: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.document
            .set_header(header.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    pub fn clear_header(&mut self) -> &mut Self {
        self.document.clear_header();
        self
    }

    /// Appends a data row. An empty row is ignored.
    pub fn add_row<I, F>(&mut self, row: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        self.document.add_row(row.into_iter().map(Into::into).collect());
        self
    }

    /// Appends the values of a keyed record in iteration order. Keys are
    /// discarded.
    pub fn add_record<I, K, V>(&mut self, record: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        V: Into<Field>,
    {
        self.document
            .add_row(record.into_iter().map(|(_, value)| value.into()).collect());
        self
    }

    pub fn add_rows<R, I, F>(&mut self, rows: R) -> &mut Self
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = F>,
        F: Into<Field>,
    {
        for row in rows {
            self.add_row(row);
        }
        self
    }

    pub fn clear_rows(&mut self) -> &mut Self {
        self.document.clear_rows();
        self
    }

    pub fn header(&self) -> Option<&[Field]> {
        self.document.header()
    }

    pub fn rows(&self) -> &[Row] {
        self.document.rows()
    }

    pub fn row_count(&self) -> usize {
        self.document.row_count()
    }

    pub fn render_header(&self) -> String {
        self.document.render_header(&self.config)
    }

    pub fn render_body(&self) -> String {
        self.document.render_body(&self.config)
    }

    pub fn render_all(&self) -> String {
        self.document.render_all(&self.config)
    }

    /// Commits to the path stored with [`ValueWriter::set_path`].
    pub fn commit(&self) -> Result<usize> {
        let path = self.path.as_deref().ok_or(WriterError::MissingPath)?;
        self.commit_path(path)
    }

    /// Normalizes `path` and commits to it, leaving the stored path untouched.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = self.normalizer.normalize(path.as_ref())?;
        self.commit_path(&path)
    }

    /// Append mode writes only the body; truncate mode writes header and body.
    fn commit_path(&self, path: &Path) -> Result<usize> {
        let mode = self.config.write_mode;
        let text = match mode {
            WriteMode::Append => self.render_body(),
            WriteMode::Truncate => self.render_all(),
        };
        self.committer.commit(path, mode, text.as_bytes())
    }
}

/// Builder for [`ValueWriter`], for callers that prefer to configure
/// everything up front.
pub struct ValueWriterBuilder {
    config: WriterConfig,
    policy: RetryPolicy,
    normalizer: Box<dyn PathNormalizer>,
    path: Option<PathBuf>,
}

impl Default for ValueWriterBuilder {
    fn default() -> Self {
        ValueWriterBuilder::new()
    }
}

impl ValueWriterBuilder {
    pub fn new() -> ValueWriterBuilder {
        ValueWriterBuilder {
            config: WriterConfig::default(),
            policy: RetryPolicy::default(),
            normalizer: Box::new(LexicalPathNormalizer),
            path: None,
        }
    }

    pub fn config(mut self, config: WriterConfig) -> ValueWriterBuilder {
        self.config = config;
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> ValueWriterBuilder {
        self.config.delimiter = delimiter.into();
        self
    }

    pub fn quote(mut self, quote: impl Into<String>) -> ValueWriterBuilder {
        self.config.quote = quote.into();
        self
    }

    pub fn line_ending(mut self, line_ending: impl Into<String>) -> ValueWriterBuilder {
        self.config.line_ending = line_ending.into();
        self
    }

    pub fn header_quote_mode(mut self, mode: QuoteMode) -> ValueWriterBuilder {
        self.config.header_quote_mode = mode;
        self
    }

    pub fn body_quote_mode(mut self, mode: QuoteMode) -> ValueWriterBuilder {
        self.config.body_quote_mode = mode;
        self
    }

    pub fn escape_mode(mut self, mode: EscapeMode) -> ValueWriterBuilder {
        self.config.escape_mode = mode;
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> ValueWriterBuilder {
        self.config.write_mode = mode;
        self
    }

    pub fn write_header(mut self, yes: bool) -> ValueWriterBuilder {
        self.config.write_header = yes;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> ValueWriterBuilder {
        self.policy = policy;
        self
    }

    pub fn normalizer(mut self, normalizer: impl PathNormalizer + 'static) -> ValueWriterBuilder {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> ValueWriterBuilder {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Fails when the configured path cannot be normalized.
    pub fn build(self) -> Result<ValueWriter> {
        let path = match &self.path {
            Some(path) => Some(self.normalizer.normalize(path)?),
            None => None,
        };

        Ok(ValueWriter {
            config: self.config,
            document: Document::new(),
            path,
            normalizer: self.normalizer,
            committer: FileCommitter::new(self.policy),
        })
    }
}
