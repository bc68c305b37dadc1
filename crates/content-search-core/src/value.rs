//! Criterion values: scalars and scalar arrays.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::operator::ValueTypes;

/// A single typed value carried by a criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
}

impl Scalar {
    /// Returns the value-type bit of this scalar.
    #[must_use]
    pub fn value_type(&self) -> ValueTypes {
        match self {
            Self::Boolean(_) => ValueTypes::BOOLEAN,
            Self::Integer(_) => ValueTypes::INTEGER,
            Self::Float(_) => ValueTypes::FLOAT,
            Self::String(_) => ValueTypes::STRING,
        }
    }

    /// Returns the value as `f64` for numeric scalars.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Self::$variant($conv(v))
                }
            }

            impl From<$ty> for CriterionValue {
                fn from(v: $ty) -> Self {
                    Self::Single(Scalar::from(v))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Boolean(|v| v),
    i32 => Integer(i64::from),
    i64 => Integer(|v| v),
    u32 => Integer(i64::from),
    f64 => Float(|v| v),
    String => String(|v| v),
    &str => String(String::from),
}

/// The value of a criterion: either one scalar or an ordered array of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    /// A single scalar.
    Single(Scalar),
    /// An array of scalars.
    Array(Vec<Scalar>),
}

impl CriterionValue {
    /// Iterates over all scalars, regardless of arity.
    pub fn scalars(&self) -> impl Iterator<Item = &Scalar> {
        let slice: &[Scalar] = match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::Array(values) => values,
        };
        slice.iter()
    }

    /// Returns the single scalar, if this is a single value.
    #[must_use]
    pub fn as_single(&self) -> Option<&Scalar> {
        match self {
            Self::Single(s) => Some(s),
            Self::Array(_) => None,
        }
    }

    /// Returns the scalar array, if this is an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Scalar]> {
        match self {
            Self::Single(_) => None,
            Self::Array(values) => Some(values),
        }
    }
}

impl From<Scalar> for CriterionValue {
    fn from(v: Scalar) -> Self {
        Self::Single(v)
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for CriterionValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(s) => write!(f, "{s}"),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}
