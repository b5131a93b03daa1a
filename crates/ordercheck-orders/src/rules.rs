//! Rule sets for customers, orders and products.
//!
//! Validators are assembled bottom-up (product, order, customer) once and
//! then shared read-only.

use crate::clock::{Clock, SystemClock};
use crate::config::OrderRulesConfig;
use crate::models::{Customer, Order, Product};
use ordercheck_validate::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Text after the last `@`, or the whole value when there is none.
pub fn email_domain(email: &str) -> &str {
    email.rsplit('@').next().unwrap_or(email)
}

pub fn product_validator() -> Result<ObjectValidator<Product>, BuildError> {
    ObjectValidator::<Product>::builder()
        .field(
            "name",
            |p: &Product| &p.name,
            vec![Rule::new(NotEmptyRule::new()).with_message("Product name cannot be empty.")],
        )
        .field(
            "price",
            |p: &Product| &p.price,
            vec![Rule::new(GreaterThanRule::new(Decimal::ZERO))
                .with_message("Product price must be greater than zero.")],
        )
        .build()
}

pub fn order_validator(
    clock: Arc<dyn Clock>,
    products: NestedValidator<Product>,
) -> Result<ObjectValidator<Order>, BuildError> {
    ObjectValidator::<Order>::builder()
        .field(
            "orderDate",
            |o: &Order| &o.order_date,
            vec![
                Rule::new(NotEmptyRule::new()).with_message("Order date cannot be empty."),
                Rule::new(LessThanOrEqualRule::dynamic(move || clock.now()))
                    .with_message("Order date cannot be in the future."),
            ],
        )
        .each(
            "products",
            |o: &Order| &o.products,
            vec![Rule::new(NotEmptyRule::new()).with_message("Order must have at least one product.")],
            products,
        )
        .build()
}

pub fn customer_validator(
    config: &OrderRulesConfig,
    order: NestedValidator<Order>,
) -> Result<ObjectValidator<Customer>, BuildError> {
    let allowed_domains = OneOfRule::new(config.allowed_email_domains.iter().cloned())
        .projected(email_domain);

    ObjectValidator::<Customer>::builder()
        .field(
            "firstName",
            |c: &Customer| &c.first_name,
            vec![Rule::new(NotEmptyRule::new()).with_message("First name cannot be empty.")],
        )
        .field(
            "lastName",
            |c: &Customer| &c.last_name,
            vec![Rule::new(NotEmptyRule::new()).with_message("Last name cannot be empty.")],
        )
        .field(
            "email",
            |c: &Customer| &c.email,
            vec![
                Rule::new(NotEmptyRule::new()).with_message("Email cannot be empty."),
                Rule::new(EmailRule::new()).with_message("Invalid email format."),
                Rule::new(allowed_domains).with_message("Email domain is not allowed."),
            ],
        )
        .nested(
            "order",
            |c: &Customer| &c.order,
            vec![Rule::new(NotNullRule::new()).with_message("Customer must have an order.")],
            order,
        )
        .build()
}

/// The assembled customer/order/product rule set.
///
/// Cloning is cheap; clones share the same validators.
#[derive(Debug, Clone)]
pub struct OrderRules {
    customer: Arc<ObjectValidator<Customer>>,
    config: Arc<OrderRulesConfig>,
}

impl OrderRules {
    /// Assemble the rule set against the wall clock.
    pub fn new(config: OrderRulesConfig) -> Result<Self, BuildError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Assemble the rule set against `clock`.
    pub fn with_clock(config: OrderRulesConfig, clock: Arc<dyn Clock>) -> Result<Self, BuildError> {
        let product: NestedValidator<Product> = Arc::new(product_validator()?);
        let order: NestedValidator<Order> = Arc::new(order_validator(clock, product)?);
        let customer = customer_validator(&config, order)?;

        tracing::debug!(
            allowed_email_domains = ?config.allowed_email_domains,
            fields = ?customer.field_names(),
            "order rules assembled"
        );

        Ok(Self {
            customer: Arc::new(customer),
            config: Arc::new(config),
        })
    }

    pub fn allowed_email_domains(&self) -> &[String] {
        &self.config.allowed_email_domains
    }
}

impl Validate<Customer> for OrderRules {
    fn validate_into(&self, value: &Customer, path: &FieldPath, report: &mut ValidationReport) {
        self.customer.validate_into(value, path, report);
    }

    fn validate(&self, value: &Customer) -> ValidationReport {
        self.customer.validate(value)
    }
}
