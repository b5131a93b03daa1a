//! Behaviour of the customer/order/product rule sets on whole request graphs.

use chrono::{Duration, Utc};
use ordercheck_orders::{Customer, Order, OrderRules, OrderRulesConfig, Product};
use ordercheck_validate::Validate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;

fn rules() -> OrderRules {
    OrderRules::new(OrderRulesConfig::default()).unwrap()
}

fn product(name: &str, price: i64) -> Product {
    Product::new(name, Decimal::from(price))
}

fn customer_with(products: Option<Vec<Product>>) -> Customer {
    Customer {
        first_name: Some("Grace".into()),
        last_name: Some("Hopper".into()),
        email: Some("grace@example.com".into()),
        order: Some(Order {
            order_date: Some(Utc::now() - Duration::minutes(5)),
            products,
        }),
    }
}

fn valid_customer() -> Customer {
    customer_with(Some(vec![product("Compiler", 10)]))
}

#[test]
fn blank_first_name_does_not_hide_nested_failures() {
    let mut customer = customer_with(Some(vec![product("", 3)]));
    customer.first_name = Some(String::new());

    let report = rules().validate(&customer);
    assert_eq!(report.paths(), vec!["firstName", "order.products[0].name"]);
    assert_eq!(report.messages("firstName"), vec!["First name cannot be empty."]);
}

#[test]
fn null_last_name_is_reported() {
    let mut customer = valid_customer();
    customer.last_name = None;

    let report = rules().validate(&customer);
    assert_eq!(report.paths(), vec!["lastName"]);
    assert_eq!(report.messages("lastName"), vec!["Last name cannot be empty."]);
}

#[test]
fn empty_email_reports_only_emptiness() {
    let mut customer = valid_customer();
    customer.email = Some(String::new());

    assert_eq!(
        rules().validate(&customer).messages("email"),
        vec!["Email cannot be empty."]
    );
}

#[test]
fn disallowed_domain_reports_exactly_one_failure() {
    let mut customer = valid_customer();
    customer.email = Some("user@notallowed.tld".into());

    let report = rules().validate(&customer);
    assert_eq!(report.paths(), vec!["email"]);
    assert_eq!(report.messages("email"), vec!["Email domain is not allowed."]);
}

#[test]
fn allowed_email_has_no_failures() {
    let mut customer = valid_customer();
    customer.email = Some("a@example.com".into());

    let report = rules().validate(&customer);
    assert!(report.get("email").is_none());
    assert!(report.is_valid());
}

#[test]
fn order_dated_one_second_ahead_fails() {
    let mut customer = valid_customer();
    customer.order.as_mut().unwrap().order_date = Some(Utc::now() + Duration::seconds(1));

    let report = rules().validate(&customer);
    assert_eq!(report.paths(), vec!["order.orderDate"]);
    assert_eq!(report.len(), 1);
}

#[test]
fn empty_product_list_skips_element_rules() {
    let report = rules().validate(&customer_with(Some(Vec::new())));
    assert_eq!(report.paths(), vec!["order.products"]);
    assert_eq!(
        report.messages("order.products"),
        vec!["Order must have at least one product."]
    );
}

#[test]
fn missing_product_list_is_reported_like_empty() {
    let report = rules().validate(&customer_with(None));
    assert_eq!(report.paths(), vec!["order.products"]);
}

#[test]
fn each_product_is_validated_independently() {
    let report = rules().validate(&customer_with(Some(vec![
        product("", 10),
        product("Linker", 0),
    ])));

    assert_eq!(
        report.paths(),
        vec!["order.products[0].name", "order.products[1].price"]
    );
    assert_eq!(
        report.messages("order.products[0].name"),
        vec!["Product name cannot be empty."]
    );
    assert_eq!(
        report.messages("order.products[1].price"),
        vec!["Product price must be greater than zero."]
    );
}

#[test]
fn end_to_end_request_reports_two_entries() {
    let json = r#"{
        "firstName": "  ",
        "lastName": "Hopper",
        "email": "x@example.com",
        "order": {
            "orderDate": "2020-01-01T00:00:00Z",
            "products": [{ "name": "Debugger", "price": -5 }]
        }
    }"#;
    let customer: Customer = serde_json::from_str(json).unwrap();

    let report = rules().validate(&customer);
    assert_eq!(report.paths(), vec!["firstName", "order.products[0].price"]);
    assert_eq!(report.len(), 2);
    assert_eq!(report.messages("firstName"), vec!["First name cannot be empty."]);
    assert_eq!(
        report.messages("order.products[0].price"),
        vec!["Product price must be greater than zero."]
    );
}

#[test]
fn api_error_body_lists_every_failure() {
    let report = rules().validate(&Customer::default());
    let body = serde_json::to_value(report.to_api_error()).unwrap();

    assert_eq!(body["error"]["type"], "validation_error");
    let fields: Vec<&str> = body["error"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["firstName", "lastName", "email", "order"]);
}

#[test]
fn rules_are_shared_across_threads() {
    let rules = Arc::new(rules());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rules = Arc::clone(&rules);
            thread::spawn(move || {
                let customer = customer_with(Some(vec![product("Item", i)]));
                rules.validate(&customer).is_valid()
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, true, true, true]);
}

proptest! {
    #[test]
    fn emails_without_at_fail_format_not_domain(email in "[a-z0-9.]{1,20}") {
        let mut customer = valid_customer();
        customer.email = Some(email);

        let report = rules().validate(&customer);
        prop_assert_eq!(report.messages("email"), vec!["Invalid email format.".to_string()]);
    }

    #[test]
    fn foreign_domains_fail_only_on_domain(user in "[a-z]{1,10}", host in "[a-z]{3,10}") {
        prop_assume!(host != "example" && host != "mycompany");
        let mut customer = valid_customer();
        customer.email = Some(format!("{user}@{host}.tld"));

        let report = rules().validate(&customer);
        prop_assert_eq!(report.paths(), vec!["email"]);
        prop_assert_eq!(report.messages("email"), vec!["Email domain is not allowed.".to_string()]);
    }

    #[test]
    fn repeated_validation_yields_identical_reports(
        names in prop::collection::vec(prop_oneof![Just(String::new()), "[a-z]{1,6}"], 0..5),
        prices in prop::collection::vec(-3i64..3, 0..5),
    ) {
        let products = names
            .iter()
            .zip(prices.iter())
            .map(|(name, price)| product(name, *price))
            .collect();
        let customer = customer_with(Some(products));
        let rules = rules();

        let first = rules.validate(&customer);
        let second = rules.validate(&customer);
        prop_assert_eq!(first.paths(), second.paths());
        prop_assert_eq!(first, second);
    }
}
