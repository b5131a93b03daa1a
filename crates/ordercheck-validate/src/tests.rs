//! Property-based tests for graph traversal and report aggregation.

#[cfg(test)]
mod property_tests {
    use crate::prelude::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[derive(Debug, Clone)]
    struct Item {
        label: String,
        amount: i64,
    }

    #[derive(Debug, Clone)]
    struct Bundle {
        contact: String,
        items: Vec<Item>,
    }

    fn item_validator() -> ObjectValidator<Item> {
        ObjectValidator::<Item>::builder()
            .field(
                "label",
                |i: &Item| &i.label,
                vec![Rule::new(NotEmptyRule::with_message("Label cannot be empty."))],
            )
            .field(
                "amount",
                |i: &Item| &i.amount,
                vec![Rule::new(
                    GreaterThanRule::new(0).with_message("Amount must be greater than zero."),
                )],
            )
            .build()
            .unwrap()
    }

    fn bundle_validator() -> ObjectValidator<Bundle> {
        ObjectValidator::<Bundle>::builder()
            .field(
                "contact",
                |b: &Bundle| &b.contact,
                vec![
                    Rule::new(NotEmptyRule::new()),
                    Rule::new(EmailRule::new()),
                    Rule::new(MustRule::new(
                        "domain",
                        "Domain is not allowed.",
                        |c: &String| c.ends_with("@example.com"),
                    )),
                ],
            )
            .each(
                "items",
                |b: &Bundle| &b.items,
                vec![Rule::new(NotEmptyRule::new())],
                Arc::new(item_validator()),
            )
            .build()
            .unwrap()
    }

    fn item_strategy() -> impl Strategy<Value = Item> {
        (prop_oneof![Just(String::new()), "[a-z]{1,8}"], -5i64..5)
            .prop_map(|(label, amount)| Item { label, amount })
    }

    fn bundle_strategy() -> impl Strategy<Value = Bundle> {
        (
            prop_oneof![
                Just(String::new()),
                "[a-z]{1,8}",
                "[a-z]{1,8}@example\\.com",
                "[a-z]{1,8}@other\\.org",
            ],
            prop::collection::vec(item_strategy(), 0..6),
        )
            .prop_map(|(contact, items)| Bundle { contact, items })
    }

    fn expected_paths(bundle: &Bundle) -> Vec<String> {
        let mut paths = Vec::new();
        if !bundle.contact.ends_with("@example.com") {
            paths.push("contact".to_string());
        }
        if bundle.items.is_empty() {
            paths.push("items".to_string());
        }
        for (index, item) in bundle.items.iter().enumerate() {
            if item.label.is_empty() {
                paths.push(format!("items[{index}].label"));
            }
            if item.amount <= 0 {
                paths.push(format!("items[{index}].amount"));
            }
        }
        paths
    }

    proptest! {
        #[test]
        fn report_lists_every_failing_path_in_traversal_order(bundle in bundle_strategy()) {
            let report = bundle_validator().validate(&bundle);
            let paths: Vec<String> = report.paths().into_iter().map(String::from).collect();
            prop_assert_eq!(paths, expected_paths(&bundle));
        }

        #[test]
        fn each_field_records_at_most_one_failure(bundle in bundle_strategy()) {
            let report = bundle_validator().validate(&bundle);
            for (_, failures) in report.iter() {
                prop_assert_eq!(failures.len(), 1);
            }
            prop_assert_eq!(report.is_valid(), report.len() == 0);
        }

        #[test]
        fn contact_without_at_never_reaches_domain_rule(contact in "[a-z .]{0,12}") {
            let bundle = Bundle { contact, items: vec![Item { label: "x".into(), amount: 1 }] };
            let report = bundle_validator().validate(&bundle);
            let failures = report.get("contact").unwrap();
            prop_assert_eq!(failures.len(), 1);
            prop_assert_ne!(failures[0].code.as_str(), "domain");
        }

        #[test]
        fn validation_is_idempotent(bundle in bundle_strategy()) {
            let validator = bundle_validator();
            let first = validator.validate(&bundle);
            let second = validator.validate(&bundle);
            prop_assert_eq!(first.paths(), second.paths());
            prop_assert_eq!(first, second);
        }
    }
}
