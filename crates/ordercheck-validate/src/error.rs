//! Failure types produced by rules, the aggregated report, and build errors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Failure from a single validation rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleError {
    /// The rule code (e.g., "not_empty", "email", "greater_than")
    pub code: String,
    /// Human-readable error message, possibly containing `{param}` placeholders
    pub message: String,
    /// Optional parameters for message interpolation
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, serde_json::Value>,
}

impl RuleError {
    /// Create a new rule error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: HashMap::new(),
        }
    }

    /// Add a parameter to the error.
    pub fn param(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.params.insert(key.into(), v);
        }
        self
    }

    /// Replace the message, keeping code and params.
    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Interpolate parameters into the message.
    ///
    /// Replaces `{param_name}` placeholders with actual values.
    pub fn interpolate_message(&self) -> String {
        let mut result = self.message.clone();
        for (key, value) in &self.params {
            let placeholder = format!("{{{}}}", key);
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => "null".to_string(),
                _ => value.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }
        result
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.interpolate_message())
    }
}

impl std::error::Error for RuleError {}

/// Aggregated result of one validation call.
///
/// Keys are field paths in the order they first failed; each list keeps the
/// order in which its rules were declared. Equality compares that order too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    fields: IndexMap<String, Vec<RuleError>>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Record a failure for a field path.
    pub fn add(&mut self, path: impl Into<String>, error: RuleError) {
        self.fields.entry(path.into()).or_default().push(error);
    }

    /// Merge another report into this one, appending to existing paths.
    pub fn merge(&mut self, other: ValidationReport) {
        for (path, errors) in other.fields {
            self.fields.entry(path).or_default().extend(errors);
        }
    }

    /// True when no field failed.
    pub fn is_valid(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of failures across all paths.
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// True when no failure was recorded; pairs with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failures recorded at `path`.
    pub fn get(&self, path: &str) -> Option<&[RuleError]> {
        self.fields.get(path).map(Vec::as_slice)
    }

    /// Interpolated messages recorded at `path`, in evaluation order.
    pub fn messages(&self, path: &str) -> Vec<String> {
        self.fields
            .get(path)
            .map(|errors| errors.iter().map(RuleError::interpolate_message).collect())
            .unwrap_or_default()
    }

    /// Field paths with failures, in the order they were first recorded.
    pub fn paths(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Iterate over `(path, failures)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RuleError])> {
        self.fields
            .iter()
            .map(|(path, errors)| (path.as_str(), errors.as_slice()))
    }

    /// `Ok(())` when valid, the report itself otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Convert into the structured error body handed to a transport layer.
    pub fn to_api_error(&self) -> ApiValidationError {
        let fields = self
            .fields
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldErrorResponse {
                    field: field.clone(),
                    code: e.code.clone(),
                    message: e.interpolate_message(),
                    params: if e.params.is_empty() {
                        None
                    } else {
                        Some(e.params.clone())
                    },
                })
            })
            .collect();

        ApiValidationError {
            error: ErrorBody {
                error_type: "validation_error".to_string(),
                message: "Validation failed".to_string(),
                fields,
            },
        }
    }
}

impl PartialEq for ValidationReport {
    fn eq(&self, other: &Self) -> bool {
        self.fields.iter().eq(other.fields.iter())
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "Validation passed");
        }
        write!(f, "Validation failed: {} error(s)", self.len())?;
        for (path, errors) in &self.fields {
            for error in errors {
                write!(f, "\n  {}: {}", path, error.interpolate_message())?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// Error body exposed to a transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationError {
    pub error: ErrorBody,
}

/// Inner body of [`ApiValidationError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub fields: Vec<FieldErrorResponse>,
}

/// Single field failure in the error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldErrorResponse {
    pub field: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, serde_json::Value>>,
}

/// Misconfiguration detected while assembling an [`ObjectValidator`](crate::ObjectValidator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A field was declared nested but no validator was wired for it.
    #[error("field `{field}` of `{type_name}` is declared nested but has no validator wired")]
    MissingNestedValidator {
        type_name: &'static str,
        field: String,
    },
    /// The same field name was registered twice.
    #[error("field `{field}` of `{type_name}` is registered more than once")]
    DuplicateField {
        type_name: &'static str,
        field: String,
    },
    /// `wire` supplied a validator for a different nested type.
    #[error("validator wired to `{field}` of `{type_name}` does not validate the field's type")]
    NestedTypeMismatch {
        type_name: &'static str,
        field: String,
    },
    /// `wire` named a field that was never declared as pending.
    #[error("cannot wire `{field}` of `{type_name}`: no pending nested field with that name")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },
    /// A field was registered with an empty name.
    #[error("`{type_name}` has a field registered with an empty name")]
    EmptyFieldName { type_name: &'static str },
}
