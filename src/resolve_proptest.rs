//! Property-based tests for label matching, selection and substitution.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::emit::identifier;
    use crate::resolve::{is_identifier, labels_contain, select, Selector};
    use crate::value::Value;
    use crate::variables::VariableStore;
    use proptest::prelude::*;
    use serde_yaml::Value as YamlValue;

    fn label() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9]{0,8}"
    }

    // ============================================================================
    // labels_contain property tests
    // ============================================================================

    proptest! {
        /// Property: every label of a comma-joined set is a member, whatever the spacing
        #[test]
        fn labels_contain_every_member(labels in prop::collection::vec(label(), 1..5), pad in " {0,2}") {
            let key = YamlValue::String(labels.join(&format!("{},{}", pad, pad)));
            for l in &labels {
                prop_assert!(labels_contain(&key, l, false));
            }
        }

        /// Property: a label outside the set never matches
        #[test]
        fn labels_contain_rejects_non_members(labels in prop::collection::vec(label(), 1..5), other in label()) {
            prop_assume!(!labels.contains(&other));
            let key = YamlValue::String(labels.join(","));
            prop_assert!(!labels_contain(&key, &other, false));
        }

        /// Property: `*` only matches when wildcards are allowed
        #[test]
        fn labels_contain_wildcard_only_when_allowed(wanted in label()) {
            let key = YamlValue::String("*".to_string());
            prop_assert!(labels_contain(&key, &wanted, true));
            prop_assert!(!labels_contain(&key, &wanted, false));
        }
    }

    // ============================================================================
    // select property tests
    // ============================================================================

    proptest! {
        /// Property: selection is deterministic and the first matching entry wins
        #[test]
        fn select_first_match_wins(envs in prop::collection::vec(label(), 1..5), values in prop::collection::vec(any::<i64>(), 1..5)) {
            let mut item = serde_yaml::Mapping::new();
            for (env, value) in envs.iter().zip(values.iter()) {
                if !item.contains_key(env.as_str()) {
                    item.insert(YamlValue::String(env.clone()), YamlValue::from(*value));
                }
            }
            let item = YamlValue::Mapping(item);
            let wanted = &envs[0];
            let selector = Selector::new(wanted, "Debug");

            let first = select(&item, &selector);
            prop_assert_eq!(first, select(&item, &selector));
            prop_assert_eq!(first, Some(&YamlValue::from(values[0])));
        }

        /// Property: a plain scalar is selected for every environment
        #[test]
        fn select_plain_scalar_always(env in label(), config in label(), value in any::<bool>()) {
            let item = YamlValue::Bool(value);
            prop_assert_eq!(select(&item, &Selector::new(&env, &config)), Some(&item));
        }
    }

    // ============================================================================
    // substitution property tests
    // ============================================================================

    proptest! {
        /// Property: text without references is returned unchanged
        #[test]
        fn substitute_without_references_is_identity(input in "[^$]*") {
            let mut store = VariableStore::new();
            store.insert("host", Value::from("example.com"));
            prop_assert_eq!(store.substitute(&input), input);
        }

        /// Property: substituted text is never scanned again
        #[test]
        fn substitute_is_single_level(name in "[a-z]{1,8}", other in "[a-z]{1,8}") {
            prop_assume!(name != other);
            let mut store = VariableStore::new();
            store.insert(name.clone(), Value::String(format!("${{{}}}", other)));
            store.insert(other.clone(), Value::from("resolved"));

            let result = store.substitute(&format!("${{{}}}", name));
            prop_assert_eq!(result, format!("${{{}}}", other));
        }
    }

    // ============================================================================
    // identifier property tests
    // ============================================================================

    proptest! {
        /// Property: identifiers are non-empty and never start with a digit
        #[test]
        fn identifier_is_valid(input in ".*") {
            let ident = identifier(&input);
            prop_assert!(!ident.is_empty());
            prop_assert!(ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            prop_assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
            prop_assert!(is_identifier(&ident));
        }
    }
}
