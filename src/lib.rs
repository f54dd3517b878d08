#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # sv-writer

 A configurable writer for delimited text (CSV, TSV and friends). Rows of
 heterogeneous values are buffered in memory, rendered with configurable
 quoting, escaping, delimiter and line-ending rules, and optionally committed
 to a file under an exclusive advisory lock.

 ## Core Concepts

- **Field:** one cell. Either a scalar (text, or a number rendered through its text) or a
  list of scalars, which is joined with the delimiter and rendered as one field.
- **Quote mode:** `quote_none` emits fields as-is, `quote_all` quotes every field,
  `quote_string` (the default) quotes everything except numeric scalars. Header and body
  rows each have their own mode.
- **Escape mode:** how a quote character inside a quoted field is written: `double`
  (`""`), `back_slash` (`\"`) or `none`.
- **Write mode:** `truncate` (default) replaces the file with header and body, `append`
  adds only the body after the existing content.

 ## Rendering

```rust
use sv_writer::{ValueWriter, fields, core::config::{EscapeMode, QuoteMode}};

let mut writer = ValueWriter::new();
writer
    .set_delimiter("\t")
    .set_line_ending("\r\n")
    .add_row(fields!["a", 1, "b"]);
assert_eq!(writer.render_body(), "\"a\"\t1\t\"b\"\r\n");

writer
    .clear_rows()
    .set_delimiter(",")
    .set_line_ending("\n")
    .set_body_quote_mode(QuoteMode::All)
    .set_escape_mode(EscapeMode::Backslash)
    .add_row(fields!["say \"hi\"", ["x", "y"]]);
assert_eq!(writer.render_body(), "\"say \\\"hi\\\"\",\"x,y\"\n");
```

 ## Committing to a file

```rust
use sv_writer::{ValueWriter, core::config::WriteMode};

# fn main() -> Result<(), sv_writer::WriterError> {
let dir = tempfile::tempdir()?;
let path = dir.path().join("people.csv");

let mut writer = ValueWriter::new();
writer.set_header(["name", "age"])?.add_row(["Alice", "30"]);
writer.write_to_file(&path)?;

writer
    .clear_rows()
    .set_write_mode(WriteMode::Append)
    .add_row(["Bob", "25"]);
writer.write_to_file(&path)?;

assert_eq!(
    std::fs::read_to_string(&path)?,
    "\"name\",\"age\"\n\"Alice\",30\"Bob\",25\n"
);
# Ok(())
# }
```

 Note the missing line break before `"Bob"`: the combined text written in truncate mode
 has its trailing line ending trimmed, and append mode adds the body as-is.

 ## Configuration

 [`WriterConfig`](core::config::WriterConfig) derives `serde::Deserialize`, so the whole
 writer configuration can be loaded from any serde format:

```rust
use sv_writer::{ValueWriter, core::config::WriterConfig};

let config: WriterConfig = serde_json::from_str(
    r#"{ "delimiter": ";", "body_quote_mode": "quote_none" }"#,
).unwrap();

let mut writer = ValueWriter::with_config(config);
writer.add_row(["a", "b"]);
assert_eq!(writer.render_all(), "a;b");
```
 */

/// Value model, configuration and rendering
pub mod core;

/// Error types for writer operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// File commits: locking, retries and path normalization
pub mod file;

/// The `ValueWriter` façade and its builder
pub mod writer;

#[doc(inline)]
pub use writer::{ValueWriter, ValueWriterBuilder};
