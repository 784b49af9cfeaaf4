//! Attribute filters of the feature style rules.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Attributes of a feature by name.
pub type AttributeMap = HashMap<String, AttributeValue>;

/// Value of a feature attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer number.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    String(String),
}

impl AttributeValue {
    /// Returns true for `Null` and empty strings.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::String(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Numeric value of the attribute. Strings are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::String(v) => v.trim().parse().ok(),
            AttributeValue::Null | AttributeValue::Bool(_) => None,
        }
    }

    /// Whether the value counts as "set" for flags: `true`, non-zero numbers and non-empty strings.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttributeValue::Null => false,
            AttributeValue::Bool(v) => *v,
            AttributeValue::Int(v) => *v != 0,
            AttributeValue::Float(v) => *v != 0.0 && !v.is_nan(),
            AttributeValue::String(v) => !v.is_empty(),
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Condition on a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Name of the attribute.
    pub attribute: String,
    /// Operator and its operand.
    pub operator: FilterOperator,
}

/// Filter operator with its operand.
///
/// All operators except `IsNull` fail when the attribute is missing or `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// String form of the value equals the operand.
    Equals(String),
    /// String form of the value is one of the operands.
    InSet(Vec<String>),
    /// String form of the value is none of the operands.
    NotInSet(Vec<String>),
    /// Value is missing or an empty string.
    IsNull,
    /// Value is present and not an empty string.
    NotNull,
    /// Numeric value is in the inclusive range.
    Between {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
}

impl FilterRule {
    /// Creates a new filter.
    pub fn new(attribute: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
        }
    }

    /// Checks the filter against the feature attributes.
    pub fn matches(&self, attributes: &AttributeMap) -> bool {
        let value = attributes
            .get(&self.attribute)
            .filter(|v| **v != AttributeValue::Null);

        match &self.operator {
            FilterOperator::IsNull => value.map_or(true, AttributeValue::is_empty),
            FilterOperator::NotNull => value.is_some_and(|v| !v.is_empty()),
            FilterOperator::Equals(operand) => value.is_some_and(|v| v.to_string() == *operand),
            FilterOperator::InSet(operands) => value.is_some_and(|v| {
                let value = v.to_string();
                operands.iter().any(|operand| *operand == value)
            }),
            FilterOperator::NotInSet(operands) => value.is_some_and(|v| {
                let value = v.to_string();
                operands.iter().all(|operand| *operand != value)
            }),
            FilterOperator::Between { lower, upper } => value
                .and_then(AttributeValue::as_f64)
                .is_some_and(|v| *lower <= v && v <= *upper),
        }
    }
}

/// Checks that all filters match. Empty list always matches.
pub fn all_match(filters: &[FilterRule], attributes: &AttributeMap) -> bool {
    filters.iter().all(|filter| filter.matches(attributes))
}
