//! Value coercion from criterion scalars to index values of a field kind.

use chrono::DateTime;

use crate::document::IndexValue;
use crate::error::{Error, Result};
use crate::field_registry::FieldKind;
use crate::value::Scalar;

fn impossible(scalar: &Scalar, kind: FieldKind) -> Error {
    Error::InvalidArgument(format!("value '{scalar}' cannot be used on a {kind:?} field"))
}

/// Coerces a scalar to the representation stored for `kind`.
///
/// Without a kind (custom physical fields) the scalar is passed through unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when the scalar cannot represent a value of the kind.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn coerce(scalar: &Scalar, kind: Option<FieldKind>) -> Result<IndexValue> {
    let Some(kind) = kind else {
        return Ok(match scalar {
            Scalar::Boolean(b) => IndexValue::Boolean(*b),
            Scalar::Integer(i) => IndexValue::Integer(*i),
            Scalar::Float(f) => IndexValue::Float(*f),
            Scalar::String(s) => IndexValue::String(s.clone()),
        });
    };

    match (kind, scalar) {
        (FieldKind::String | FieldKind::Text, _) => Ok(IndexValue::String(scalar.to_string())),

        (FieldKind::Integer, Scalar::Integer(i)) => Ok(IndexValue::Integer(*i)),
        (FieldKind::Integer, Scalar::Float(f)) if f.fract() == 0.0 => {
            Ok(IndexValue::Integer(*f as i64))
        }
        (FieldKind::Integer, Scalar::String(s)) => s
            .trim()
            .parse()
            .map(IndexValue::Integer)
            .map_err(|_| impossible(scalar, kind)),

        (FieldKind::Float, Scalar::Integer(_) | Scalar::Float(_)) => scalar
            .as_f64()
            .map(IndexValue::Float)
            .ok_or_else(|| impossible(scalar, kind)),
        (FieldKind::Float, Scalar::String(s)) => s
            .trim()
            .parse()
            .map(IndexValue::Float)
            .map_err(|_| impossible(scalar, kind)),

        (FieldKind::Boolean, Scalar::Boolean(b)) => Ok(IndexValue::Boolean(*b)),
        (FieldKind::Boolean, Scalar::Integer(i @ (0 | 1))) => Ok(IndexValue::Boolean(*i == 1)),
        (FieldKind::Boolean, Scalar::String(s)) => match s.trim() {
            "true" | "1" => Ok(IndexValue::Boolean(true)),
            "false" | "0" => Ok(IndexValue::Boolean(false)),
            _ => Err(impossible(scalar, kind)),
        },

        (FieldKind::Date, Scalar::Integer(i)) => Ok(IndexValue::Date(*i)),
        (FieldKind::Date, Scalar::String(s)) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s.trim()).ok().map(|dt| dt.timestamp()))
            .map(IndexValue::Date)
            .ok_or_else(|| impossible(scalar, kind)),

        _ => Err(impossible(scalar, kind)),
    }
}
