//! Structural merge of node lists
//!
//! Later entries win. Maps merge with maps and lists with lists, key by
//! key and index by index; a scalar, or a node of the other kind,
//! replaces what came before. The first entry is updated in place.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::{is_empty, set_prop};
use crate::path::get_path;
use crate::value::Value;
use crate::walk::walk;
use tracing::trace;

/// Merge a list value. Non-list input passes through unchanged.
pub fn merge(objs: &Value) -> Option<Value> {
    match objs {
        Value::List(list) => {
            let entries = list.borrow().clone();
            merge_list(&entries)
        }
        other => Some(other.clone()),
    }
}

/// Merge a slice of values. An empty slice yields `None`.
pub fn merge_list(objs: &[Value]) -> Option<Value> {
    let (first, rest) = objs.split_first()?;
    let mut out = first.clone();

    for obj in rest {
        if !obj.is_node() || !out.is_node() || obj.is_map() != out.is_map() {
            out = obj.clone();
            continue;
        }

        // cur[i] is the node in `out` receiving writes at depth i
        let mut cur: Vec<Option<Value>> = vec![Some(out.clone())];
        let target = out.clone();

        walk(obj.clone(), &mut |key, val, parent, path| {
            let Some(key) = key else {
                return val;
            };
            let depth = path.len() - 1;
            if cur.len() < depth + 2 {
                cur.resize(depth + 2, None);
            }

            let as_list = parent.is_some_and(Value::is_list);
            let dest = match &cur[depth] {
                Some(dest) => dest.clone(),
                None => {
                    let dest = match get_path(&path[..depth], &target) {
                        Some(found) if found.is_node() && found.is_list() == as_list => found,
                        _ if as_list => Value::list(),
                        _ => Value::map(),
                    };
                    cur[depth] = Some(dest.clone());
                    dest
                }
            };

            if val.is_node() && !is_empty(&val) {
                if let Some(child) = cur[depth + 1].take() {
                    set_prop(&dest, key, Some(child));
                }
            } else {
                set_prop(&dest, key, Some(val.clone()));
            }
            val
        });
    }

    trace!(count = objs.len(), "merged values");
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn merged(json: serde_json::Value) -> Option<serde_json::Value> {
        merge(&v(json)).map(|m| m.to_json())
    }

    #[test]
    fn test_identity_and_empty() {
        assert_eq!(merged(json!([])), None);
        assert_eq!(merged(json!([{"a": 1}])), Some(json!({"a": 1})));
        assert_eq!(merged(json!("scalar")), Some(json!("scalar")));
    }

    #[test]
    fn test_map_merge_is_structural() {
        assert_eq!(
            merged(json!([{"a": 1, "b": {"x": 1}}, {"b": {"y": 2}}])),
            Some(json!({"a": 1, "b": {"x": 1, "y": 2}}))
        );
    }

    #[test]
    fn test_later_wins() {
        assert_eq!(
            merged(json!([{"a": 1, "b": 2}, {"b": 3}, {"c": 4}])),
            Some(json!({"a": 1, "b": 3, "c": 4}))
        );
    }

    #[test]
    fn test_scalars_and_kind_mismatch_replace() {
        assert_eq!(merged(json!([{"a": 1}, 2])), Some(json!(2)));
        assert_eq!(merged(json!([{"a": 1}, [1]])), Some(json!([1])));
        assert_eq!(merged(json!([{"a": {"b": 1}}, {"a": [2]}])), Some(json!({"a": [2]})));
        assert_eq!(merged(json!([{"a": 1}, {"a": {"b": 2}}])), Some(json!({"a": {"b": 2}})));
    }

    #[test]
    fn test_list_merge_by_index() {
        assert_eq!(merged(json!([[1, 2, 3], [9]])), Some(json!([9, 2, 3])));
        assert_eq!(
            merged(json!([{"a": [1, {"x": 1}]}, {"a": [0, {"y": 2}, 3]}])),
            Some(json!({"a": [0, {"x": 1, "y": 2}, 3]}))
        );
    }

    #[test]
    fn test_deep_new_branches() {
        assert_eq!(
            merged(json!([{"a": 1}, {"b": {"c": {"d": 1}}}])),
            Some(json!({"a": 1, "b": {"c": {"d": 1}}}))
        );
    }

    #[test]
    fn test_empty_nodes_overwrite() {
        assert_eq!(merged(json!([{"a": {"x": 1}}, {"a": {}}])), Some(json!({"a": {}})));
    }

    #[test]
    fn test_first_argument_updated_in_place() {
        let first = v(json!({"a": 1}));
        let out = merge_list(&[first.clone(), v(json!({"b": 2}))]).unwrap();
        assert!(out.same(&first));
        assert_eq!(first.to_json(), json!({"a": 1, "b": 2}));
    }
}
