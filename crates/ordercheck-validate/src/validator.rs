//! Object validators: per-field rule chains plus nested descent.
//!
//! A validator walks its fields in declaration order. Every field is
//! evaluated; only the rules inside one field's chain short-circuit.
//!
//! ```rust
//! use ordercheck_validate::prelude::*;
//! use std::sync::Arc;
//!
//! struct Line { qty: i32 }
//! struct Cart { owner: Option<String>, lines: Vec<Line> }
//!
//! let line = ObjectValidator::<Line>::builder()
//!     .field("qty", |l: &Line| &l.qty, vec![Rule::new(GreaterThanRule::new(0))])
//!     .build()
//!     .unwrap();
//!
//! let cart = ObjectValidator::<Cart>::builder()
//!     .field("owner", |c: &Cart| &c.owner, vec![Rule::new(NotEmptyRule::new())])
//!     .each("lines", |c: &Cart| &c.lines, vec![Rule::new(NotEmptyRule::new())], Arc::new(line))
//!     .build()
//!     .unwrap();
//!
//! let report = cart.validate(&Cart { owner: None, lines: vec![Line { qty: 0 }] });
//! assert_eq!(report.paths(), vec!["owner", "lines[0].qty"]);
//! ```

use crate::chain::RuleChain;
use crate::error::{BuildError, ValidationReport};
use crate::path::FieldPath;
use crate::traits::Validate;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Values that may hold a single nested object.
pub trait AsNested<U> {
    fn as_nested(&self) -> Option<&U>;
}

impl<U> AsNested<U> for U {
    fn as_nested(&self) -> Option<&U> {
        Some(self)
    }
}

impl<U> AsNested<U> for Option<U> {
    fn as_nested(&self) -> Option<&U> {
        self.as_ref()
    }
}

impl<U> AsNested<U> for Box<U> {
    fn as_nested(&self) -> Option<&U> {
        Some(self.as_ref())
    }
}

/// Values that may hold a collection of nested objects.
pub trait AsElements<U> {
    fn as_elements(&self) -> Option<&[U]>;
}

impl<U> AsElements<U> for [U] {
    fn as_elements(&self) -> Option<&[U]> {
        Some(self)
    }
}

impl<U> AsElements<U> for Vec<U> {
    fn as_elements(&self) -> Option<&[U]> {
        Some(self.as_slice())
    }
}

impl<U> AsElements<U> for Option<Vec<U>> {
    fn as_elements(&self) -> Option<&[U]> {
        self.as_deref()
    }
}

/// Shared handle to a nested validator.
pub type NestedValidator<U> = Arc<dyn Validate<U>>;

type Selector<T, V> = Box<dyn Fn(&T) -> &V + Send + Sync>;

/// What happens after a field's chain ran.
enum Descent<V: ?Sized, U> {
    None,
    Object {
        target: fn(&V) -> Option<&U>,
        validator: Option<NestedValidator<U>>,
    },
    Each {
        elements: fn(&V) -> Option<&[U]>,
        validator: Option<NestedValidator<U>>,
    },
}

impl<V: ?Sized, U> Descent<V, U> {
    fn slot(&mut self) -> Option<&mut Option<NestedValidator<U>>> {
        match self {
            Descent::None => None,
            Descent::Object { validator, .. } | Descent::Each { validator, .. } => Some(validator),
        }
    }

    fn is_unwired(&self) -> bool {
        matches!(
            self,
            Descent::Object {
                validator: None,
                ..
            } | Descent::Each {
                validator: None,
                ..
            }
        )
    }
}

struct FieldSpec<T, V: ?Sized, U> {
    name: String,
    selector: Selector<T, V>,
    chain: RuleChain<V>,
    descent: Descent<V, U>,
}

trait FieldEntry<T>: Send + Sync {
    fn name(&self) -> &str;

    fn is_nested(&self) -> bool;

    fn is_unwired(&self) -> bool;

    /// Install `validator` (an `Arc<dyn Validate<U>>`); false on a type mismatch.
    fn wire(&mut self, validator: &dyn Any) -> bool;

    fn run(&self, object: &T, path: &FieldPath, report: &mut ValidationReport);
}

impl<T, V, U> FieldEntry<T> for FieldSpec<T, V, U>
where
    T: 'static,
    V: ?Sized + 'static,
    U: 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn is_nested(&self) -> bool {
        !matches!(self.descent, Descent::None)
    }

    fn is_unwired(&self) -> bool {
        self.descent.is_unwired()
    }

    fn wire(&mut self, validator: &dyn Any) -> bool {
        let Some(validator) = validator.downcast_ref::<NestedValidator<U>>() else {
            return false;
        };
        match self.descent.slot() {
            Some(slot) => {
                *slot = Some(Arc::clone(validator));
                true
            }
            None => false,
        }
    }

    fn run(&self, object: &T, path: &FieldPath, report: &mut ValidationReport) {
        let value = (self.selector)(object);
        let field_path = path.field(&self.name);

        let outcome = self.chain.evaluate(value);
        for failure in outcome.failures {
            trace_trace!(path = %field_path, code = %failure.code, "rule failed");
            report.add(field_path.as_str(), failure);
        }
        if outcome.presence_failed {
            return;
        }

        match &self.descent {
            Descent::None => {}
            Descent::Object { target, validator } => {
                if let (Some(validator), Some(nested)) = (validator, target(value)) {
                    validator.validate_into(nested, &field_path, report);
                }
            }
            Descent::Each {
                elements,
                validator,
            } => {
                if let (Some(validator), Some(items)) = (validator, elements(value)) {
                    for (index, item) in items.iter().enumerate() {
                        validator.validate_into(item, &field_path.index(index), report);
                    }
                }
            }
        }
    }
}

/// Validator for one entity type, assembled with [`ObjectValidatorBuilder`].
///
/// Immutable once built; share it behind an `Arc` across threads.
pub struct ObjectValidator<T> {
    type_name: &'static str,
    fields: Vec<Box<dyn FieldEntry<T>>>,
}

impl<T: 'static> ObjectValidator<T> {
    pub fn builder() -> ObjectValidatorBuilder<T> {
        ObjectValidatorBuilder::new()
    }

    /// Registered field names, in evaluation order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name()).collect()
    }
}

impl<T> Validate<T> for ObjectValidator<T> {
    fn validate_into(&self, value: &T, path: &FieldPath, report: &mut ValidationReport) {
        for field in &self.fields {
            field.run(value, path, report);
        }
    }

    fn validate(&self, value: &T) -> ValidationReport {
        let mut report = ValidationReport::new();
        self.validate_into(value, &FieldPath::root(), &mut report);
        trace_debug!(
            type_name = self.type_name,
            failed_paths = report.paths().len(),
            failures = report.len(),
            "validation finished"
        );
        report
    }
}

impl<T> fmt::Debug for ObjectValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|field| field.name()).collect();
        f.debug_struct("ObjectValidator")
            .field("type_name", &self.type_name)
            .field("fields", &names)
            .finish()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Registers fields for an [`ObjectValidator`].
///
/// Registration never fails on its own; problems are collected and reported
/// by [`build`](Self::build).
pub struct ObjectValidatorBuilder<T> {
    type_name: &'static str,
    fields: Vec<Box<dyn FieldEntry<T>>>,
    errors: Vec<BuildError>,
}

impl<T: 'static> ObjectValidatorBuilder<T> {
    pub fn new() -> Self {
        Self {
            type_name: short_type_name::<T>(),
            fields: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A field validated by its rule chain only.
    pub fn field<V, F>(self, name: &str, selector: F, rules: impl Into<RuleChain<V>>) -> Self
    where
        V: ?Sized + 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        self.register::<V, ()>(name, Box::new(selector), rules.into(), Descent::None)
    }

    /// A field holding one nested object, validated by `validator`.
    pub fn nested<V, U, F>(
        self,
        name: &str,
        selector: F,
        rules: impl Into<RuleChain<V>>,
        validator: NestedValidator<U>,
    ) -> Self
    where
        V: AsNested<U> + 'static,
        U: 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let descent = Descent::Object {
            target: <V as AsNested<U>>::as_nested,
            validator: Some(validator),
        };
        self.register(name, Box::new(selector), rules.into(), descent)
    }

    /// A field holding a collection, each element validated by `validator`.
    pub fn each<V, U, F>(
        self,
        name: &str,
        selector: F,
        rules: impl Into<RuleChain<V>>,
        validator: NestedValidator<U>,
    ) -> Self
    where
        V: AsElements<U> + ?Sized + 'static,
        U: 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let descent = Descent::Each {
            elements: <V as AsElements<U>>::as_elements,
            validator: Some(validator),
        };
        self.register(name, Box::new(selector), rules.into(), descent)
    }

    /// Declare a nested object field whose validator is supplied later with
    /// [`wire`](Self::wire).
    pub fn nested_pending<V, U, F>(
        self,
        name: &str,
        selector: F,
        rules: impl Into<RuleChain<V>>,
    ) -> Self
    where
        V: AsNested<U> + 'static,
        U: 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let descent = Descent::Object {
            target: <V as AsNested<U>>::as_nested,
            validator: None,
        };
        self.register(name, Box::new(selector), rules.into(), descent)
    }

    /// Declare a collection field whose element validator is supplied later
    /// with [`wire`](Self::wire).
    pub fn each_pending<V, U, F>(self, name: &str, selector: F, rules: impl Into<RuleChain<V>>) -> Self
    where
        V: AsElements<U> + ?Sized + 'static,
        U: 'static,
        F: Fn(&T) -> &V + Send + Sync + 'static,
    {
        let descent = Descent::Each {
            elements: <V as AsElements<U>>::as_elements,
            validator: None,
        };
        self.register(name, Box::new(selector), rules.into(), descent)
    }

    /// Supply the validator of a field declared with `nested_pending` or
    /// `each_pending`.
    pub fn wire<U: 'static>(mut self, name: &str, validator: NestedValidator<U>) -> Self {
        let type_name = self.type_name;
        match self
            .fields
            .iter_mut()
            .find(|field| field.name() == name && field.is_nested())
        {
            Some(field) => {
                if !field.wire(&validator) {
                    self.errors.push(BuildError::NestedTypeMismatch {
                        type_name,
                        field: name.to_string(),
                    });
                }
            }
            None => self.errors.push(BuildError::UnknownField {
                type_name,
                field: name.to_string(),
            }),
        }
        self
    }

    /// Finish assembly, failing on the first configuration problem.
    pub fn build(mut self) -> Result<ObjectValidator<T>, BuildError> {
        if !self.errors.is_empty() {
            return Err(self.errors.remove(0));
        }
        if let Some(field) = self.fields.iter().find(|field| field.is_unwired()) {
            return Err(BuildError::MissingNestedValidator {
                type_name: self.type_name,
                field: field.name().to_string(),
            });
        }
        Ok(ObjectValidator {
            type_name: self.type_name,
            fields: self.fields,
        })
    }

    fn register<V, U>(
        mut self,
        name: &str,
        selector: Selector<T, V>,
        chain: RuleChain<V>,
        descent: Descent<V, U>,
    ) -> Self
    where
        V: ?Sized + 'static,
        U: 'static,
    {
        if name.is_empty() {
            self.errors.push(BuildError::EmptyFieldName {
                type_name: self.type_name,
            });
            return self;
        }
        if self.fields.iter().any(|field| field.name() == name) {
            self.errors.push(BuildError::DuplicateField {
                type_name: self.type_name,
                field: name.to_string(),
            });
            return self;
        }
        self.fields.push(Box::new(FieldSpec {
            name: name.to_string(),
            selector,
            chain,
            descent,
        }));
        self
    }
}

impl<T: 'static> Default for ObjectValidatorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
