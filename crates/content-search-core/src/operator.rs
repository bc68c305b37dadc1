//! Operator specifications.
//!
//! Every criterion leaf publishes a static table of [`Specification`]s, one per
//! operator it accepts. A specification states whether the operator takes a single
//! scalar or an array, which scalar types are accepted and, optionally, how many
//! array elements are required. Criteria validate against their table when they are
//! constructed, so a criterion that exists is always well formed.
//!
//! ```rust,ignore
//! use content_search_core::operator::{Operator, Specification, ValueFormat, ValueTypes};
//!
//! const BETWEEN: Specification =
//!     Specification::new(Operator::Between, ValueFormat::Array)
//!         .with_types(ValueTypes::INTEGER)
//!         .with_count(2);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::value::CriterionValue;

/// Comparison operator of a criterion leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Equality.
    Eq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Value is one of a list.
    In,
    /// Value lies within an inclusive `[low, high]` range.
    Between,
    /// Wildcard match (`*` any run of characters, `?` one character).
    Like,
    /// Multi-valued field contains the value.
    Contains,
}

impl Operator {
    /// Returns the canonical upper-case name of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::Contains => "CONTAINS",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arity of the value accepted by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Exactly one scalar.
    Single,
    /// An array of scalars.
    Array,
}

bitflags! {
    /// Bitmask of scalar types accepted by an operator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ValueTypes: u8 {
        /// Integer scalars.
        const INTEGER = 1;
        /// String scalars.
        const STRING = 2;
        /// Boolean scalars.
        const BOOLEAN = 4;
        /// Floating point scalars.
        const FLOAT = 8;
    }
}

/// Immutable metadata describing what one operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specification {
    /// Operator described by this specification.
    pub operator: Operator,
    /// Single scalar or array.
    pub value_format: ValueFormat,
    /// Accepted scalar types; `None` accepts any type.
    pub value_types: Option<ValueTypes>,
    /// Exact number of array elements, if constrained.
    pub value_count: Option<usize>,
}

impl Specification {
    /// Creates a specification accepting any scalar type and any array length.
    #[must_use]
    pub const fn new(operator: Operator, value_format: ValueFormat) -> Self {
        Self {
            operator,
            value_format,
            value_types: None,
            value_count: None,
        }
    }

    /// Restricts the accepted scalar types.
    #[must_use]
    pub const fn with_types(mut self, value_types: ValueTypes) -> Self {
        self.value_types = Some(value_types);
        self
    }

    /// Requires an exact number of array elements.
    #[must_use]
    pub const fn with_count(mut self, value_count: usize) -> Self {
        self.value_count = Some(value_count);
        self
    }

    /// Checks a value against this specification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on arity, count or type mismatch.
    pub fn validate(&self, target: &str, value: &CriterionValue) -> Result<()> {
        match (self.value_format, value) {
            (ValueFormat::Single, CriterionValue::Array(_)) => {
                return Err(Error::InvalidArgument(format!(
                    "{target}: operator {} expects a single value, got an array",
                    self.operator
                )));
            }
            (ValueFormat::Array, CriterionValue::Single(_)) => {
                return Err(Error::InvalidArgument(format!(
                    "{target}: operator {} expects an array of values",
                    self.operator
                )));
            }
            (ValueFormat::Array, CriterionValue::Array(values)) => {
                if values.is_empty() {
                    return Err(Error::InvalidArgument(format!(
                        "{target}: operator {} requires at least one value",
                        self.operator
                    )));
                }
                if let Some(count) = self.value_count {
                    if values.len() != count {
                        return Err(Error::InvalidArgument(format!(
                            "{target}: operator {} expects exactly {count} values, got {}",
                            self.operator,
                            values.len()
                        )));
                    }
                }
            }
            (ValueFormat::Single, CriterionValue::Single(_)) => {}
        }

        if let Some(accepted) = self.value_types {
            if let Some(bad) = value
                .scalars()
                .find(|s| !accepted.contains(s.value_type()))
            {
                return Err(Error::InvalidArgument(format!(
                    "{target}: value '{bad}' has a type not accepted by operator {}",
                    self.operator
                )));
            }
        }

        Ok(())
    }
}

/// A criterion leaf's table of operator specifications.
#[derive(Debug, Clone, Copy)]
pub struct Specifications {
    criterion: &'static str,
    table: &'static [Specification],
}

impl Specifications {
    /// Wraps a static specification table for the named criterion kind.
    #[must_use]
    pub const fn new(criterion: &'static str, table: &'static [Specification]) -> Self {
        Self { criterion, table }
    }

    /// Name of the criterion kind owning this table.
    #[must_use]
    pub const fn criterion(&self) -> &'static str {
        self.criterion
    }

    /// Looks up the specification for an operator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] if the operator is not in the table.
    pub fn spec_for(&self, operator: Operator) -> Result<&'static Specification> {
        self.table
            .iter()
            .find(|s| s.operator == operator)
            .ok_or_else(|| Error::invalid_operator(self.criterion, operator))
    }

    /// Iterates over the supported operators, in table order.
    pub fn supported_operators(&self) -> impl Iterator<Item = Operator> + 'static {
        self.table.iter().map(|s| s.operator)
    }

    /// Returns true if the operator is in the table.
    #[must_use]
    pub fn supports(&self, operator: Operator) -> bool {
        self.table.iter().any(|s| s.operator == operator)
    }

    /// Validates an operator/value pair against the table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidOperator`] for unsupported operators, otherwise the errors of
    /// [`Specification::validate`].
    pub fn validate(&self, target: &str, operator: Operator, value: &CriterionValue) -> Result<()> {
        self.spec_for(operator)?.validate(target, value)
    }

    /// Returns the raw table.
    #[must_use]
    pub const fn as_slice(&self) -> &'static [Specification] {
        self.table
    }
}
