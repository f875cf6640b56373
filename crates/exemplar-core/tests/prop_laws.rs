//! Property-based tests for the engine
//!
//! These tests check laws that hold for every JSON-shaped input: merge
//! identities, traversal no-ops, list write semantics, path identity and
//! deep-copy independence.

use exemplar_core::{
    clone, get_path, get_prop, merge_list, set_prop, stringify, transform, walk, Value,
};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for arbitrary JSON values without callables
fn json_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z ]{0,8}".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for JSON maps at the root
fn json_map_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop::collection::btree_map("[a-z]{1,4}", json_strategy(), 0..5)
        .prop_map(|m| serde_json::Value::Object(m.into_iter().collect()))
}

proptest! {
    #[test]
    fn merge_of_one_is_identity(json in json_strategy()) {
        let out = merge_list(&[Value::from(json.clone())]).unwrap();
        prop_assert_eq!(out.to_json(), json);
    }

    #[test]
    fn merge_with_copy_is_idempotent(json in json_strategy()) {
        let val = Value::from(json.clone());
        let out = merge_list(&[val.clone(), clone(&val)]).unwrap();
        prop_assert_eq!(out.to_json(), json);
    }

    #[test]
    fn merge_last_scalar_wins(json in json_strategy(), n in any::<i32>()) {
        let out = merge_list(&[Value::from(json), Value::from(json!(n))]).unwrap();
        prop_assert_eq!(out.to_json(), json!(n));
    }

    #[test]
    fn walk_identity_is_noop(json in json_strategy()) {
        let out = walk(Value::from(json.clone()), &mut |_, val, _, _| val);
        prop_assert_eq!(out.to_json(), json);
    }

    #[test]
    fn empty_path_is_store(json in json_map_strategy()) {
        let store = Value::from(json);
        let found = get_path("", &store).unwrap();
        prop_assert!(found.same(&store));
    }

    #[test]
    fn clone_is_independent(json in json_map_strategy()) {
        let original = Value::from(json.clone());
        let copy = clone(&original);
        prop_assert_eq!(copy.to_json(), json.clone());

        set_prop(&copy, "ZZ", Some(Value::from(1)));
        for (key, _) in json.as_object().unwrap() {
            set_prop(&copy, key.as_str(), None);
        }
        prop_assert_eq!(original.to_json(), json);
    }

    #[test]
    fn list_writes_past_end_append(items in prop::collection::vec(any::<i32>(), 0..8), extra in 0i64..5) {
        let list = Value::from(json!(items));
        let len = items.len();
        set_prop(&list, len as i64 + extra, Some(Value::from("new")));
        prop_assert_eq!(list.len(), len + 1);
        prop_assert_eq!(get_prop(&list, len), Some(Value::from("new")));
    }

    #[test]
    fn list_negative_write_prepends(items in prop::collection::vec(any::<i32>(), 0..8)) {
        let list = Value::from(json!(items));
        set_prop(&list, -1, Some(Value::from("first")));
        prop_assert_eq!(list.len(), items.len() + 1);
        prop_assert_eq!(get_prop(&list, 0), Some(Value::from("first")));
    }

    #[test]
    fn list_delete_shifts_down(items in prop::collection::vec(any::<i32>(), 1..8)) {
        let list = Value::from(json!(items));
        set_prop(&list, 0, None);
        prop_assert_eq!(list.len(), items.len() - 1);
        prop_assert_eq!(list.to_json(), json!(items[1..].to_vec()));
    }

    #[test]
    fn stringify_keeps_plain_strings(text in "[ -~]{0,20}") {
        prop_assert_eq!(stringify(&Value::from(text.as_str()), None), text);
    }

    #[test]
    fn literal_spec_transforms_to_itself(spec in json_map_strategy(), data in json_map_strategy()) {
        let out = transform(&Value::from(data), &Value::from(spec.clone())).unwrap();
        prop_assert_eq!(out.to_json(), spec);
    }
}
