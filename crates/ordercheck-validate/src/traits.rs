//! Core validation traits.

use crate::error::{RuleError, ValidationReport};
use crate::path::FieldPath;
use std::fmt::Debug;

/// Trait for individual validation rules.
///
/// Each rule checks a single value and returns a `RuleError` on failure.
/// Rules are pure: they never mutate the value and never perform I/O.
///
/// ## Example
///
/// ```rust
/// use ordercheck_validate::{RuleError, ValidationRule};
///
/// #[derive(Debug)]
/// struct PositiveRule;
///
/// impl ValidationRule<i32> for PositiveRule {
///     fn validate(&self, value: &i32) -> Result<(), RuleError> {
///         if *value > 0 {
///             Ok(())
///         } else {
///             Err(RuleError::new("positive", "Value must be positive"))
///         }
///     }
///
///     fn rule_name(&self) -> &'static str {
///         "positive"
///     }
/// }
///
/// assert!(PositiveRule.validate(&3).is_ok());
/// ```
pub trait ValidationRule<T: ?Sized>: Debug + Send + Sync {
    /// Validate the value against this rule.
    fn validate(&self, value: &T) -> Result<(), RuleError>;

    /// Get the rule name/code for error reporting.
    fn rule_name(&self) -> &'static str;

    /// Whether a failure of this rule means the value is absent.
    ///
    /// A failed presence rule stops descent into nested validators for the
    /// same field.
    fn governs_presence(&self) -> bool {
        false
    }

    /// Get the default error message for this rule.
    fn default_message(&self) -> String {
        format!("Validation failed for rule '{}'", self.rule_name())
    }
}

/// A validator for values of type `T`.
///
/// Implementors append failures into a caller-owned report so nested
/// validators can share one accumulator.
pub trait Validate<T: ?Sized>: Send + Sync {
    /// Validate `value`, recording failures below `path`.
    fn validate_into(&self, value: &T, path: &FieldPath, report: &mut ValidationReport);

    /// Validate `value` as a root object and return a fresh report.
    fn validate(&self, value: &T) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(value, &FieldPath::root(), &mut report);
        report
    }

    /// Validate and convert the report into a `Result`.
    fn check(&self, value: &T) -> Result<(), ValidationReport> {
        self.validate(value).into_result()
    }

    /// Validate and hand the value back if it passed.
    fn validated(&self, value: T) -> Result<T, ValidationReport>
    where
        T: Sized,
    {
        self.check(&value)?;
        Ok(value)
    }
}
