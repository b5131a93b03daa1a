//! # ordercheck orders
//!
//! Customer/order/product request models and the rule sets that guard them.
//!
//! ```rust
//! use ordercheck_orders::{Customer, OrderRules, OrderRulesConfig};
//! use ordercheck_validate::Validate;
//!
//! let rules = OrderRules::new(OrderRulesConfig::default()).unwrap();
//! let customer: Customer = serde_json::from_str(r#"{ "firstName": "" }"#).unwrap();
//!
//! let report = rules.validate(&customer);
//! assert_eq!(report.paths(), vec!["firstName", "lastName", "email", "order"]);
//! ```

pub mod clock;
pub mod config;
pub mod models;
pub mod rules;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, OrderRulesConfig};
pub use models::{Customer, Order, Product};
pub use rules::{customer_validator, order_validator, product_validator, OrderRules};
