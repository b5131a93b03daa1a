//! Per-field rule chains.

use crate::error::RuleError;
use crate::traits::ValidationRule;
use std::fmt;

/// How a [`RuleChain`] proceeds after a failing rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CascadeMode {
    /// Stop at the first failing rule of the chain.
    #[default]
    Stop,
    /// Run every rule and record each failure.
    Continue,
}

enum Message<V: ?Sized> {
    Text(String),
    Lazy(Box<dyn Fn(&V) -> String + Send + Sync>),
}

/// One check bound to a field, with an optional message override.
pub struct Rule<V: ?Sized> {
    check: Box<dyn ValidationRule<V>>,
    message: Option<Message<V>>,
    governing: bool,
}

impl<V: ?Sized> Rule<V> {
    pub fn new<R>(check: R) -> Self
    where
        R: ValidationRule<V> + 'static,
    {
        let governing = check.governs_presence();
        Self {
            check: Box::new(check),
            message: None,
            governing,
        }
    }

    /// Replace the failure message. `{param}` placeholders still interpolate.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(Message::Text(message.into()));
        self
    }

    /// Build the failure message from the failing value.
    pub fn with_message_fn<F>(mut self, message: F) -> Self
    where
        F: Fn(&V) -> String + Send + Sync + 'static,
    {
        self.message = Some(Message::Lazy(Box::new(message)));
        self
    }

    /// Override whether a failure of this rule blocks nested validation.
    pub fn governing(mut self, governing: bool) -> Self {
        self.governing = governing;
        self
    }

    pub fn name(&self) -> &'static str {
        self.check.rule_name()
    }

    pub fn is_governing(&self) -> bool {
        self.governing
    }

    pub fn evaluate(&self, value: &V) -> Result<(), RuleError> {
        self.check.validate(value).map_err(|error| match &self.message {
            None => error,
            Some(Message::Text(text)) => error.with_message(text.clone()),
            Some(Message::Lazy(build)) => error.with_message(build(value)),
        })
    }
}

impl<V: ?Sized> fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("check", &self.check)
            .field("governing", &self.governing)
            .finish_non_exhaustive()
    }
}

/// Result of running a chain against one value.
#[derive(Debug, Default)]
pub struct ChainOutcome {
    pub failures: Vec<RuleError>,
    /// A governing rule failed; nested validation must not run.
    pub presence_failed: bool,
}

/// Ordered rules for one field.
pub struct RuleChain<V: ?Sized> {
    rules: Vec<Rule<V>>,
    cascade: CascadeMode,
}

impl<V: ?Sized> RuleChain<V> {
    pub fn new(rules: Vec<Rule<V>>) -> Self {
        Self {
            rules,
            cascade: CascadeMode::Stop,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn cascade(mut self, cascade: CascadeMode) -> Self {
        self.cascade = cascade;
        self
    }

    pub fn push(&mut self, rule: Rule<V>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, value: &V) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();
        for rule in &self.rules {
            if let Err(error) = rule.evaluate(value) {
                outcome.presence_failed |= rule.is_governing();
                outcome.failures.push(error);
                if self.cascade == CascadeMode::Stop {
                    break;
                }
            }
        }
        outcome
    }
}

impl<V: ?Sized> From<Vec<Rule<V>>> for RuleChain<V> {
    fn from(rules: Vec<Rule<V>>) -> Self {
        Self::new(rules)
    }
}

impl<V: ?Sized> From<Rule<V>> for RuleChain<V> {
    fn from(rule: Rule<V>) -> Self {
        Self::new(vec![rule])
    }
}

impl<V: ?Sized> fmt::Debug for RuleChain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("rules", &self.rules)
            .field("cascade", &self.cascade)
            .finish()
    }
}
