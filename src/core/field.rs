//! Field values and their quoted/escaped textual form.

use std::borrow::Cow;

use super::config::{EscapeMode, Format, QuoteMode};

/// A single cell of a row.
///
/// Scalars are kept as text; numbers are converted through their `Display`
/// form when the field is built. A list holds one level of scalars and is
/// rendered as a single field whose elements are joined with the delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Scalar(String),
    List(Vec<String>),
}

impl Field {
    pub fn is_list(&self) -> bool {
        matches!(self, Field::List(_))
    }

    /// Scalar text, or the list elements joined with `delimiter`.
    pub fn text(&self, delimiter: &str) -> Cow<'_, str> {
        match self {
            Field::Scalar(value) => Cow::Borrowed(value),
            Field::List(values) => Cow::Owned(values.join(delimiter)),
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Scalar(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Scalar(value)
    }
}

impl From<&String> for Field {
    fn from(value: &String) -> Self {
        Field::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Field {
                fn from(value: $ty) -> Self {
                    Field::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char);

impl<T: ToString> From<Vec<T>> for Field {
    fn from(values: Vec<T>) -> Self {
        Field::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for Field {
    fn from(values: &[T]) -> Self {
        Field::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for Field {
    fn from(values: [T; N]) -> Self {
        Field::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Returns true when `value` reads as a number literal.
///
/// Accepted: an optional sign, digits with at most one decimal point (and at
/// least one digit overall), then an optional exponent such as `e-3`.
pub fn is_numeric(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let mut digits = 0;
    let mut seen_point = false;
    while let Some(&byte) = bytes.get(pos) {
        match byte {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_point => seen_point = true,
            _ => break,
        }
        pos += 1;
    }
    if digits == 0 {
        return false;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let start = pos;
        while matches!(bytes.get(pos), Some(b'0'..=b'9')) {
            pos += 1;
        }
        if pos == start {
            return false;
        }
    }

    pos == bytes.len()
}

/// Applies the escape transform for content that is about to be quoted.
pub fn escape<'a>(value: &'a str, quote: &str, mode: EscapeMode) -> Cow<'a, str> {
    if quote.is_empty() || !value.contains(quote) {
        return Cow::Borrowed(value);
    }
    match mode {
        EscapeMode::Double => Cow::Owned(value.replace(quote, &format!("{quote}{quote}"))),
        EscapeMode::Backslash => Cow::Owned(value.replace(quote, &format!("\\{quote}"))),
        EscapeMode::None => Cow::Borrowed(value),
    }
}

fn quote(value: &str, format: &Format<'_>) -> String {
    let escaped = escape(value, format.quote, format.escape);
    let mut out = String::with_capacity(escaped.len() + 2 * format.quote.len());
    out.push_str(format.quote);
    out.push_str(&escaped);
    out.push_str(format.quote);
    out
}

/// Renders one field according to `mode`.
pub fn render_field(field: &Field, mode: QuoteMode, format: &Format<'_>) -> String {
    match mode {
        QuoteMode::None => field.text(format.delimiter).into_owned(),
        QuoteMode::All => quote(&field.text(format.delimiter), format),
        QuoteMode::String => match field {
            Field::Scalar(value) if is_numeric(value) => value.clone(),
            _ => quote(&field.text(format.delimiter), format),
        },
    }
}
