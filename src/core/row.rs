use super::{
    config::{Format, QuoteMode},
    field::{Field, render_field},
};

/// An ordered sequence of fields.
pub type Row = Vec<Field>;

/// Builds a [`Row`] from heterogeneous values, converting each one with
/// [`Field::from`].
///
/// ```
/// use sv_writer::{fields, core::field::Field};
///
/// let row = fields!["name", 42, ["a", "b"]];
/// assert_eq!(row[1], Field::Scalar("42".to_string()));
/// assert!(row[2].is_list());
/// ```
#[macro_export]
macro_rules! fields {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::core::field::Field::from($value)),*]
    };
}

/// Joins the rendered fields with the delimiter and terminates the line.
///
/// An empty row contributes nothing, not even a line ending.
pub fn render_row(row: &[Field], mode: QuoteMode, format: &Format<'_>) -> String {
    if row.is_empty() {
        return String::new();
    }

    let mut line = row
        .iter()
        .map(|field| render_field(field, mode, format))
        .collect::<Vec<_>>()
        .join(format.delimiter);
    line.push_str(format.line_ending);
    line
}
