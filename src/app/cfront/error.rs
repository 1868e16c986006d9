//! Validation errors raised while mapping CloudFormation input to the CloudFront API shape.
//!
//! Every failure falls into one of two kinds:
//!
//! - [`ErrorKind::Type`] - a field arrived with a runtime shape that none of its accepted forms
//!   match (a string where a list is expected, a number for a boolean field, ...).
//! - [`ErrorKind::Value`] - the shape is acceptable but the value breaks a rule: a required key
//!   is missing, a number is out of range, a list has duplicates, a paired field is alone, or an
//!   exactly-one-of group has zero or several members.
//!
//! Errors carry a dotted path to the offending field. The path grows from the leaf outwards as the
//! error propagates through [`MappingError::at`], so an error raised while parsing a TTL deep inside
//! a behavior reads `DistributionConfig.CacheBehaviors[1].MinTTL`.

use serde_json::Value;
use std::fmt;

/// Result type for every `from_external_form` constructor
pub type MapResult<T> = Result<T, MappingError>;

/// Discriminant of a [`MappingError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Runtime type did not match any accepted form
    Type,
    /// Value failed a semantic check
    Value,
}

/// A failed conversion from external form
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// Wrong runtime shape for a field
    Type {
        path: String,
        expected: &'static str,
        received: String,
    },
    /// Semantic rule violated
    Value { path: String, message: String },
}

impl MappingError {
    /// Type mismatch. `received` is described from the offending value itself.
    pub fn type_mismatch(path: impl Into<String>, expected: &'static str, received: &Value) -> Self {
        MappingError::Type {
            path: path.into(),
            expected,
            received: describe_value(received),
        }
    }

    /// Semantic failure on a field
    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        MappingError::Value {
            path: path.into(),
            message: message.into(),
        }
    }

    /// A required key is absent from a mapping
    pub fn missing(path: impl Into<String>) -> Self {
        MappingError::Value {
            path: path.into(),
            message: "required key is missing".to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MappingError::Type { .. } => ErrorKind::Type,
            MappingError::Value { .. } => ErrorKind::Value,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            MappingError::Type { path, .. } | MappingError::Value { path, .. } => path,
        }
    }

    /// Prefix the error path with the name of the enclosing field.
    ///
    /// Index segments (`[2]`) attach without a separating dot.
    pub fn at(self, parent: &str) -> Self {
        let join = |path: String| {
            if path.is_empty() {
                parent.to_string()
            } else if path.starts_with('[') {
                format!("{}{}", parent, path)
            } else {
                format!("{}.{}", parent, path)
            }
        };
        match self {
            MappingError::Type {
                path,
                expected,
                received,
            } => MappingError::Type {
                path: join(path),
                expected,
                received,
            },
            MappingError::Value { path, message } => MappingError::Value {
                path: join(path),
                message,
            },
        }
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::Type {
                path,
                expected,
                received,
            } => write!(f, "'{}' must be {}. got: {}", path, expected, received),
            MappingError::Value { path, message } => write!(f, "'{}': {}", path, message),
        }
    }
}

impl std::error::Error for MappingError {}

/// JSON type name of a value, as shown in error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => json_type_name(value).to_string(),
        scalar => format!("{} {}", json_type_name(scalar), scalar),
    }
}
