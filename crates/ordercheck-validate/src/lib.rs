//! # ordercheck validation engine
//!
//! Validates a nested object graph against per-type rule sets and reports
//! every failure at once, addressed by field path.
//!
//! ## Features
//!
//! - Ordered rule chains per field, short-circuiting at the first failure
//!   (or collecting all of them with [`CascadeMode::Continue`])
//! - Nested objects and collections of objects with
//!   `parent.items[2].field` paths
//! - Built-in presence, format, allow-list, comparison and predicate rules
//! - Misconfigured validators rejected when they are built, never while
//!   validating
//!
//! ## Example
//!
//! ```rust
//! use ordercheck_validate::prelude::*;
//!
//! struct Signup {
//!     email: Option<String>,
//! }
//!
//! let validator = ObjectValidator::<Signup>::builder()
//!     .field(
//!         "email",
//!         |s: &Signup| &s.email,
//!         vec![
//!             Rule::new(NotEmptyRule::new()).with_message("Email cannot be empty."),
//!             Rule::new(EmailRule::new()).with_message("Invalid email format."),
//!         ],
//!     )
//!     .build()
//!     .unwrap();
//!
//! let report = validator.validate(&Signup { email: Some("nope".into()) });
//! assert_eq!(report.messages("email"), vec!["Invalid email format."]);
//! ```

#[macro_use]
mod tracing_macros;

mod chain;
mod error;
mod path;
mod rules;
mod traits;
mod validator;

#[cfg(test)]
mod tests;

pub use chain::{CascadeMode, ChainOutcome, Rule, RuleChain};
pub use error::{
    ApiValidationError, BuildError, ErrorBody, FieldErrorResponse, RuleError, ValidationReport,
};
pub use path::FieldPath;
pub use rules::{
    EmailRule, GreaterThanRule, IsEmpty, LessThanOrEqualRule, MustRule, NotEmptyRule, NotNullRule,
    OneOfRule, Reference, TextValue,
};
pub use traits::{Validate, ValidationRule};
pub use validator::{AsElements, AsNested, NestedValidator, ObjectValidator, ObjectValidatorBuilder};

/// Prelude module for validation
pub mod prelude {
    pub use crate::chain::{CascadeMode, Rule, RuleChain};
    pub use crate::error::{BuildError, RuleError, ValidationReport};
    pub use crate::path::FieldPath;
    pub use crate::rules::{
        EmailRule, GreaterThanRule, LessThanOrEqualRule, MustRule, NotEmptyRule, NotNullRule,
        OneOfRule,
    };
    pub use crate::traits::{Validate, ValidationRule};
    pub use crate::validator::{NestedValidator, ObjectValidator};
}
