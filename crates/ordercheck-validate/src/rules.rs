//! Built-in validation rules.
//!
//! Presence rules ([`NotEmptyRule`], [`NotNullRule`]) judge absence. Every
//! other rule treats an absent (`None`) value as passing so that each
//! failure is reported by exactly one rule.

use crate::error::RuleError;
use crate::traits::ValidationRule;
use chrono::{DateTime, TimeZone};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, OnceLock};

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // RFC 5322 simplified email regex
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        )
        .expect("email pattern compiles")
    })
}

/// Values that can be judged empty by [`NotEmptyRule`].
pub trait IsEmpty {
    fn is_empty_value(&self) -> bool;
}

impl IsEmpty for str {
    /// Whitespace-only text counts as empty.
    fn is_empty_value(&self) -> bool {
        self.trim().is_empty()
    }
}

impl IsEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.as_str().is_empty_value()
    }
}

impl<T> IsEmpty for [T] {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T> IsEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<Tz: TimeZone> IsEmpty for DateTime<Tz> {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl<T: IsEmpty> IsEmpty for Option<T> {
    fn is_empty_value(&self) -> bool {
        match self {
            Some(value) => value.is_empty_value(),
            None => true,
        }
    }
}

/// Values that expose optional text to the string rules.
pub trait TextValue {
    fn text(&self) -> Option<&str>;
}

impl TextValue for str {
    fn text(&self) -> Option<&str> {
        Some(self)
    }
}

impl TextValue for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: TextValue> TextValue for Option<T> {
    fn text(&self) -> Option<&str> {
        self.as_ref().and_then(TextValue::text)
    }
}

/// Fails on empty or whitespace-only strings, empty collections and `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotEmptyRule {
    pub message: Option<String>,
}

impl NotEmptyRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl<T: IsEmpty + ?Sized> ValidationRule<T> for NotEmptyRule {
    fn validate(&self, value: &T) -> Result<(), RuleError> {
        if value.is_empty_value() {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| "This field cannot be empty".to_string());
            Err(RuleError::new("not_empty", message))
        } else {
            Ok(())
        }
    }

    fn rule_name(&self) -> &'static str {
        "not_empty"
    }

    fn governs_presence(&self) -> bool {
        true
    }
}

/// Fails on `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotNullRule {
    pub message: Option<String>,
}

impl NotNullRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl<T: Send + Sync> ValidationRule<Option<T>> for NotNullRule {
    fn validate(&self, value: &Option<T>) -> Result<(), RuleError> {
        if value.is_some() {
            Ok(())
        } else {
            let message = self
                .message
                .clone()
                .unwrap_or_else(|| "This field is required".to_string());
            Err(RuleError::new("not_null", message))
        }
    }

    fn rule_name(&self) -> &'static str {
        "not_null"
    }

    fn governs_presence(&self) -> bool {
        true
    }
}

/// Email format validation rule.
///
/// Validates that a string is a valid email address according to a
/// simplified RFC 5322 grammar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailRule {
    pub message: Option<String>,
}

impl EmailRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

impl<T: TextValue + ?Sized> ValidationRule<T> for EmailRule {
    fn validate(&self, value: &T) -> Result<(), RuleError> {
        match value.text() {
            Some(text) if !email_regex().is_match(text) => {
                let message = self
                    .message
                    .clone()
                    .unwrap_or_else(|| "Invalid email format".to_string());
                Err(RuleError::new("email", message))
            }
            _ => Ok(()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "email"
    }
}

/// Allow-list membership of a (possibly projected) string value.
///
/// The projection picks the part of the value to look up, such as the domain
/// of an email address.
#[derive(Clone)]
pub struct OneOfRule {
    allowed: Vec<String>,
    ignore_ascii_case: bool,
    project: fn(&str) -> &str,
    pub message: Option<String>,
}

fn identity(value: &str) -> &str {
    value
}

impl OneOfRule {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            ignore_ascii_case: false,
            project: identity,
            message: None,
        }
    }

    /// Compare ignoring ASCII case.
    pub fn ignore_ascii_case(mut self) -> Self {
        self.ignore_ascii_case = true;
        self
    }

    /// Look up `project(value)` instead of the whole value.
    pub fn projected(mut self, project: fn(&str) -> &str) -> Self {
        self.project = project;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn contains(&self, candidate: &str) -> bool {
        self.allowed.iter().any(|allowed| {
            if self.ignore_ascii_case {
                allowed.eq_ignore_ascii_case(candidate)
            } else {
                allowed == candidate
            }
        })
    }
}

impl fmt::Debug for OneOfRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneOfRule")
            .field("allowed", &self.allowed)
            .field("ignore_ascii_case", &self.ignore_ascii_case)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl<T: TextValue + ?Sized> ValidationRule<T> for OneOfRule {
    fn validate(&self, value: &T) -> Result<(), RuleError> {
        let Some(text) = value.text() else {
            return Ok(());
        };
        let candidate = (self.project)(text);
        if self.contains(candidate) {
            return Ok(());
        }
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "'{value}' is not an allowed value".to_string());
        Err(RuleError::new("one_of", message)
            .param("value", candidate)
            .param("allowed", &self.allowed))
    }

    fn rule_name(&self) -> &'static str {
        "one_of"
    }
}

/// Custom predicate rule.
///
/// ```rust
/// use ordercheck_validate::{MustRule, ValidationRule};
///
/// let even = MustRule::new("even", "Must be even", |n: &i32| n % 2 == 0);
/// assert!(even.validate(&4).is_ok());
/// assert!(even.validate(&3).is_err());
/// ```
pub struct MustRule<T: ?Sized> {
    code: &'static str,
    message: String,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T: ?Sized> MustRule<T> {
    pub fn new<F>(code: &'static str, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            code,
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl<T: ?Sized> fmt::Debug for MustRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MustRule")
            .field("code", &self.code)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized> ValidationRule<T> for MustRule<T> {
    fn validate(&self, value: &T) -> Result<(), RuleError> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(RuleError::new(self.code, self.message.clone()))
        }
    }

    fn rule_name(&self) -> &'static str {
        self.code
    }
}

/// Comparison bound that is either fixed or read on every evaluation.
pub enum Reference<T> {
    Fixed(T),
    Dynamic(Arc<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> Reference<T> {
    pub fn resolve(&self) -> T {
        match self {
            Reference::Fixed(value) => value.clone(),
            Reference::Dynamic(read) => read(),
        }
    }
}

impl<T: Clone> Clone for Reference<T> {
    fn clone(&self) -> Self {
        match self {
            Reference::Fixed(value) => Reference::Fixed(value.clone()),
            Reference::Dynamic(read) => Reference::Dynamic(Arc::clone(read)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Reference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Reference::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Inclusive upper bound.
///
/// With a [`Reference::Dynamic`] bound the reference is re-read for every
/// value, so the same value may pass now and fail later.
#[derive(Debug, Clone)]
pub struct LessThanOrEqualRule<T> {
    pub reference: Reference<T>,
    pub message: Option<String>,
}

impl<T> LessThanOrEqualRule<T> {
    pub fn new(bound: T) -> Self {
        Self {
            reference: Reference::Fixed(bound),
            message: None,
        }
    }

    /// Use a bound computed on each evaluation.
    pub fn dynamic<F>(read: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            reference: Reference::Dynamic(Arc::new(read)),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> LessThanOrEqualRule<T>
where
    T: PartialOrd + Clone + Serialize,
{
    fn check(&self, value: &T) -> Result<(), RuleError> {
        let bound = self.reference.resolve();
        if *value <= bound {
            return Ok(());
        }
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "Must be less than or equal to '{comparison_value}'".to_string());
        Err(RuleError::new("less_than_or_equal", message)
            .param("comparison_value", &bound)
            .param("value", value))
    }
}

impl<T> ValidationRule<T> for LessThanOrEqualRule<T>
where
    T: PartialOrd + Clone + Serialize + fmt::Debug + Send + Sync,
{
    fn validate(&self, value: &T) -> Result<(), RuleError> {
        self.check(value)
    }

    fn rule_name(&self) -> &'static str {
        "less_than_or_equal"
    }
}

impl<T> ValidationRule<Option<T>> for LessThanOrEqualRule<T>
where
    T: PartialOrd + Clone + Serialize + fmt::Debug + Send + Sync,
{
    fn validate(&self, value: &Option<T>) -> Result<(), RuleError> {
        value.as_ref().map_or(Ok(()), |value| self.check(value))
    }

    fn rule_name(&self) -> &'static str {
        "less_than_or_equal"
    }
}

/// Strict (exclusive) lower bound.
#[derive(Debug, Clone, PartialEq)]
pub struct GreaterThanRule<T> {
    pub threshold: T,
    pub message: Option<String>,
}

impl<T> GreaterThanRule<T> {
    pub fn new(threshold: T) -> Self {
        Self {
            threshold,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> GreaterThanRule<T>
where
    T: PartialOrd + Serialize,
{
    fn check(&self, value: &T) -> Result<(), RuleError> {
        if *value > self.threshold {
            return Ok(());
        }
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "Must be greater than '{comparison_value}'".to_string());
        Err(RuleError::new("greater_than", message)
            .param("comparison_value", &self.threshold)
            .param("value", value))
    }
}

impl<T> ValidationRule<T> for GreaterThanRule<T>
where
    T: PartialOrd + Serialize + fmt::Debug + Send + Sync,
{
    fn validate(&self, value: &T) -> Result<(), RuleError> {
        self.check(value)
    }

    fn rule_name(&self) -> &'static str {
        "greater_than"
    }
}

impl<T> ValidationRule<Option<T>> for GreaterThanRule<T>
where
    T: PartialOrd + Serialize + fmt::Debug + Send + Sync,
{
    fn validate(&self, value: &Option<T>) -> Result<(), RuleError> {
        value.as_ref().map_or(Ok(()), |value| self.check(value))
    }

    fn rule_name(&self) -> &'static str {
        "greater_than"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn not_empty_rejects_empty_blank_and_none() {
        let rule = NotEmptyRule::new();
        assert!(rule.validate("").is_err());
        assert!(rule.validate("   ").is_err());
        assert!(ValidationRule::<Option<String>>::validate(&rule, &None).is_err());
        assert!(rule.validate(&Some("Ada".to_string())).is_ok());
        assert!(rule.validate(&Vec::<u8>::new()).is_err());
        assert!(rule.validate(&vec![1u8]).is_ok());
    }

    #[test]
    fn not_empty_accepts_present_date() {
        let rule = NotEmptyRule::new();
        assert!(rule.validate(&Some(Utc::now())).is_ok());
        assert!(ValidationRule::<Option<DateTime<Utc>>>::validate(&rule, &None).is_err());
    }

    #[test]
    fn not_null_only_checks_presence() {
        let rule = NotNullRule::with_message("Required");
        assert!(rule.validate(&Some(String::new())).is_ok());
        let err = ValidationRule::<Option<String>>::validate(&rule, &None).unwrap_err();
        assert_eq!(err.code, "not_null");
        assert_eq!(err.message, "Required");
    }

    #[test]
    fn presence_rules_govern() {
        assert!(ValidationRule::<str>::governs_presence(&NotEmptyRule::new()));
        assert!(ValidationRule::<Option<u8>>::governs_presence(&NotNullRule::new()));
        assert!(!ValidationRule::<str>::governs_presence(&EmailRule::new()));
    }

    #[test]
    fn email_rule_valid() {
        let rule = EmailRule::new();
        assert!(rule.validate("test@example.com").is_ok());
        assert!(rule.validate("user.name+tag@domain.co.uk").is_ok());
    }

    #[test]
    fn email_rule_invalid() {
        let rule = EmailRule::new();
        assert!(rule.validate("invalid").is_err());
        assert!(rule.validate("@domain.com").is_err());
        assert!(rule.validate("user@").is_err());
    }

    #[test]
    fn email_rule_is_ascii_only() {
        let rule = EmailRule::new();
        assert!(rule.validate("josé@example.com").is_err());
    }

    #[test]
    fn email_rule_ignores_none() {
        let rule = EmailRule::new();
        assert!(ValidationRule::<Option<String>>::validate(&rule, &None).is_ok());
    }

    #[test]
    fn one_of_projects_and_ignores_case() {
        fn domain(email: &str) -> &str {
            email.rsplit('@').next().unwrap_or(email)
        }

        let rule = OneOfRule::new(["example.com"])
            .projected(domain)
            .ignore_ascii_case();
        assert!(rule.validate("a@Example.COM").is_ok());

        let err = rule.validate("a@other.org").unwrap_err();
        assert_eq!(err.code, "one_of");
        assert_eq!(err.interpolate_message(), "'other.org' is not an allowed value");
    }

    #[test]
    fn must_rule_uses_its_code() {
        let rule = MustRule::new("even", "Must be even", |n: &i32| n % 2 == 0);
        let err = rule.validate(&3).unwrap_err();
        assert_eq!(err.code, "even");
        assert_eq!(rule.rule_name(), "even");
    }

    #[test]
    fn less_than_or_equal_fixed_bound() {
        let rule = LessThanOrEqualRule::new(10);
        assert!(rule.validate(&10).is_ok());
        let err = rule.validate(&11).unwrap_err();
        assert_eq!(err.interpolate_message(), "Must be less than or equal to '10'");
    }

    #[test]
    fn less_than_or_equal_reads_clock_each_time() {
        let rule = LessThanOrEqualRule::dynamic(Utc::now);
        assert!(rule.validate(&(Utc::now() - Duration::seconds(1))).is_ok());
        assert!(rule.validate(&(Utc::now() + Duration::seconds(60))).is_err());
        assert!(ValidationRule::<Option<DateTime<Utc>>>::validate(&rule, &None).is_ok());
    }

    #[test]
    fn greater_than_is_exclusive() {
        let rule = GreaterThanRule::new(0);
        assert!(rule.validate(&1).is_ok());
        assert!(rule.validate(&0).is_err());
        assert!(rule.validate(&-5).is_err());
        assert!(rule.validate(&Some(3)).is_ok());
        assert!(ValidationRule::<Option<i32>>::validate(&rule, &None).is_ok());
    }
}
