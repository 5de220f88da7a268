//! Property-based tests for the configuration pipeline.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::{json, Value};

use super::hook::set_path;
use super::merger::deep_merge;
use super::schema::{BaseConfig, SchemaSettings};
use super::sources::{coerce, deserialize_lenient, env_source};
use super::ConfigTree;

// Strategy for generating scalar leaves
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

// Strategy for generating nested values of bounded depth
fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]{1,2}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

// Strategy for generating config trees
fn tree_strategy() -> impl Strategy<Value = ConfigTree> {
    prop::collection::btree_map("[a-d]{1,2}", value_strategy(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // Merging a tree with itself changes nothing
    #[test]
    fn merge_is_idempotent(tree in tree_strategy()) {
        prop_assert_eq!(deep_merge(&tree, &tree), tree);
    }

    // The merged key set is the union of both key sets
    #[test]
    fn merge_keys_are_union(base in tree_strategy(), overlay in tree_strategy()) {
        let merged = deep_merge(&base, &overlay);

        let expected: BTreeSet<&String> = base.keys().chain(overlay.keys()).collect();
        let actual: BTreeSet<&String> = merged.keys().collect();
        prop_assert_eq!(actual, expected);
    }

    // Every non-mapping overlay value is taken verbatim
    #[test]
    fn merge_overlay_leaves_win(base in tree_strategy(), overlay in tree_strategy()) {
        let merged = deep_merge(&base, &overlay);

        for (key, value) in &overlay {
            let base_is_object = base.get(key).is_some_and(Value::is_object);
            if !(value.is_object() && base_is_object) {
                prop_assert_eq!(&merged[key], value);
            }
        }
    }

    // Keys only present in the base survive untouched
    #[test]
    fn merge_base_only_keys_survive(base in tree_strategy(), overlay in tree_strategy()) {
        let merged = deep_merge(&base, &overlay);

        for (key, value) in base.iter().filter(|(k, _)| !overlay.contains_key(*k)) {
            prop_assert_eq!(&merged[key], value);
        }
    }

    // Integers stay strings in the tree and parse into integer fields
    #[test]
    fn coerce_integers_parse_on_demand(n in any::<i64>()) {
        let raw = n.to_string();
        prop_assert_eq!(coerce(&raw), Value::String(raw.clone()));

        let mut tree = ConfigTree::new();
        tree.insert("n".to_string(), coerce(&raw));
        let parsed: std::collections::BTreeMap<String, i64> = deserialize_lenient(tree).unwrap();
        prop_assert_eq!(parsed["n"], n);
    }

    // Scalars that are not JSON containers stay strings
    #[test]
    fn coerce_words_stay_strings(word in "[a-z0-9_][a-z0-9_.]{0,15}") {
        prop_assert_eq!(coerce(&word), Value::String(word.clone()));
    }

    // A value set at a dotted path is found at that path
    #[test]
    fn set_path_then_get_path(
        segments in prop::collection::vec("[a-z]{1,6}", 1..5),
        start in tree_strategy(),
        n in any::<i32>(),
    ) {
        let path = segments.join(".");
        let mut tree = start;
        set_path(&mut tree, &path, json!(n)).unwrap();

        let config: BaseConfig = serde_json::from_value(Value::Object(tree)).unwrap();
        prop_assert_eq!(config.get_path(&path), Some(&json!(n)));
    }

    // Only declared keys are read from the environment
    #[test]
    fn env_source_only_declared_keys(
        declared in prop::collection::btree_set("[a-z]{1,6}", 0..4),
        vars in prop::collection::vec(("[A-Z]{1,6}", "[a-z0-9]{0,6}"), 0..8),
    ) {
        let settings = SchemaSettings::new().env_prefix("P_").env_keys(declared.iter().cloned());
        let vars: Vec<(String, String)> = vars
            .into_iter()
            .map(|(k, v)| (format!("P_{k}"), v))
            .collect();

        let tree = env_source(&settings, &vars);
        for key in tree.keys() {
            prop_assert!(declared.contains(key));
        }
    }
}
