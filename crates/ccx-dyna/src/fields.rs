//! Fixed-width field rendering and splitting.
//!
//! Columns are positional: every field is right-justified inside its declared
//! width and the padding is the only separator. Integers use
//! [`INT_WIDTH`] columns, floats [`FLOAT_WIDTH`] columns with
//! [`FLOAT_PRECISION`] decimals in fixed-point notation.
//!
//! A value that needs more columns than its field is never truncated. Under
//! [`OverflowPolicy::Fail`] it is an error; under [`OverflowPolicy::Widen`] the
//! field grows to fit and the line loses strict alignment.

use std::fmt::Write as _;

use crate::error::{FieldError, RecordError};
use crate::format::{FLOAT_PRECISION, FLOAT_WIDTH, INT_WIDTH};
use crate::options::OverflowPolicy;

/// A value to render into one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Int(i32),
    Float(f64),
}

impl Field {
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Int(_) => FieldKind::Int,
            Field::Float(_) => FieldKind::Float,
        }
    }

    pub fn as_int(self) -> Option<i32> {
        match self {
            Field::Int(v) => Some(v),
            Field::Float(_) => None,
        }
    }

    pub fn as_float(self) -> Option<f64> {
        match self {
            Field::Float(v) => Some(v),
            Field::Int(_) => None,
        }
    }
}

/// Declared type of a column range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Float,
}

impl FieldKind {
    pub const fn width(self) -> usize {
        match self {
            FieldKind::Int => INT_WIDTH,
            FieldKind::Float => FLOAT_WIDTH,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FieldKind::Int => "integer",
            FieldKind::Float => "float",
        }
    }
}

/// Node record: identifier and three coordinates.
pub const NODE_LAYOUT: [FieldKind; 4] = [
    FieldKind::Int,
    FieldKind::Float,
    FieldKind::Float,
    FieldKind::Float,
];

/// Total column count of a layout.
pub fn layout_width(layout: &[FieldKind]) -> usize {
    layout.iter().map(|k| k.width()).sum()
}

/// Renders lists of fields into fixed-width lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFormatter {
    overflow: OverflowPolicy,
}

impl RecordFormatter {
    pub fn new(overflow: OverflowPolicy) -> Self {
        Self { overflow }
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Append one line (without newline) to `out`.
    ///
    /// Returns the number of fields that were widened. `out` is left
    /// untouched when an error is returned.
    pub fn format_into(&self, out: &mut String, fields: &[Field]) -> Result<usize, FieldError> {
        let start = out.len();
        let mut widened = 0;
        for field in fields {
            match self.push_field(out, *field) {
                Ok(true) => widened += 1,
                Ok(false) => {}
                Err(err) => {
                    out.truncate(start);
                    return Err(err);
                }
            }
        }
        Ok(widened)
    }

    /// Render one line (without newline).
    pub fn format_line(&self, fields: &[Field]) -> Result<String, FieldError> {
        let mut line = String::with_capacity(fields.iter().map(|f| f.kind().width()).sum());
        self.format_into(&mut line, fields)?;
        Ok(line)
    }

    fn push_field(&self, out: &mut String, field: Field) -> Result<bool, FieldError> {
        let width = field.kind().width();
        let precision = FLOAT_PRECISION;
        let start = out.len();
        // Writing into a String cannot fail.
        let _ = match field {
            Field::Int(v) => write!(out, "{v:>width$}"),
            Field::Float(v) => {
                if !v.is_finite() {
                    return Err(FieldError::NonFinite(v));
                }
                write!(out, "{v:>width$.precision$}")
            }
        };

        let used = out.len() - start;
        if used <= width {
            return Ok(false);
        }
        match self.overflow {
            OverflowPolicy::Fail => {
                let text = out[start..].to_string();
                out.truncate(start);
                Err(FieldError::Overflow { text, width })
            }
            OverflowPolicy::Widen => {
                tracing::warn!(
                    value = &out[start..],
                    width,
                    "field widened to fit value"
                );
                Ok(true)
            }
        }
    }
}

/// Split a line into fields according to `layout`.
///
/// The line must span exactly the layout's columns; a trailing `\r` is
/// ignored.
pub fn split_fields(line: &str, layout: &[FieldKind]) -> Result<Vec<Field>, RecordError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if !line.is_ascii() {
        return Err(RecordError::NonAscii);
    }
    let expected = layout_width(layout);
    if line.len() != expected {
        return Err(RecordError::Width {
            expected,
            found: line.len(),
        });
    }

    let mut fields = Vec::with_capacity(layout.len());
    let mut start = 0;
    for kind in layout {
        let end = start + kind.width();
        let text = line[start..end].trim();
        if text.is_empty() {
            return Err(RecordError::BlankField {
                start: start + 1,
                end,
            });
        }
        let invalid = || RecordError::InvalidField {
            start: start + 1,
            end,
            kind: kind.name(),
            text: text.to_string(),
        };
        let field = match kind {
            FieldKind::Int => Field::Int(text.parse::<i32>().map_err(|_| invalid())?),
            FieldKind::Float => {
                let v = text.parse::<f64>().map_err(|_| invalid())?;
                if !v.is_finite() {
                    return Err(invalid());
                }
                Field::Float(v)
            }
        };
        fields.push(field);
        start = end;
    }
    Ok(fields)
}

/// Split a line made only of integer fields.
pub fn split_ints(line: &str, count: usize) -> Result<Vec<i32>, RecordError> {
    let layout = vec![FieldKind::Int; count];
    Ok(split_fields(line, &layout)?
        .into_iter()
        .filter_map(Field::as_int)
        .collect())
}
