//! Depth-first, post-order traversal with in-place replacement
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::{items, set_prop};
use crate::value::Value;

/// Walk `val` children-first, replacing each child with the result of
/// `apply(key, value, parent, path)` before the parent itself is applied.
///
/// Children are materialized before any write, so `apply` may freely
/// rewrite the node being walked.
pub fn walk<F>(val: Value, apply: &mut F) -> Value
where
    F: FnMut(Option<&str>, Value, Option<&Value>, &[String]) -> Value,
{
    let mut path = Vec::new();
    descend(val, apply, None, None, &mut path)
}

/// [`walk`] for a value that already sits under `key` in `parent` at
/// `path`. Child paths extend `path`.
pub fn walk_from<F>(
    val: Value,
    apply: &mut F,
    key: Option<&str>,
    parent: Option<&Value>,
    path: &[String],
) -> Value
where
    F: FnMut(Option<&str>, Value, Option<&Value>, &[String]) -> Value,
{
    let mut path = path.to_vec();
    descend(val, apply, key, parent, &mut path)
}

fn descend<F>(
    val: Value,
    apply: &mut F,
    key: Option<&str>,
    parent: Option<&Value>,
    path: &mut Vec<String>,
) -> Value
where
    F: FnMut(Option<&str>, Value, Option<&Value>, &[String]) -> Value,
{
    if val.is_node() {
        for (child_key, child) in items(&val) {
            path.push(child_key.clone());
            let out = descend(child, apply, Some(&child_key), Some(&val), path);
            path.pop();
            set_prop(&val, child_key.as_str(), Some(out));
        }
    }
    apply(key, val, parent, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identity_walk() {
        let val = Value::from(json!({"a": {"b": [1, {"c": 2}]}, "d": "x"}));
        let out = walk(val.clone(), &mut |_, v, _, _| v);
        assert_eq!(out.to_json(), json!({"a": {"b": [1, {"c": 2}]}, "d": "x"}));
    }

    #[test]
    fn test_post_order_with_paths() {
        let val = Value::from(json!({"a": {"b": 1}, "c": [2]}));
        let mut seen = Vec::new();
        walk(val, &mut |key, v, _, path| {
            seen.push(format!("{}={}", key.unwrap_or("<root>"), path.join(".")));
            v
        });
        assert_eq!(seen, vec!["b=a.b", "a=a", "0=c.0", "c=c", "<root>="]);
    }

    #[test]
    fn test_replaces_leaves() {
        let val = Value::from(json!({"a": 1, "b": [2, 3]}));
        let out = walk(val, &mut |_, v, _, _| match v.as_i64() {
            Some(n) => Value::from(n * 10),
            None => v,
        });
        assert_eq!(out.to_json(), json!({"a": 10, "b": [20, 30]}));
    }

    #[test]
    fn test_walk_from_position() {
        let root = Value::from(json!({"x": {"y": {"z": 1}}}));
        let node = crate::accessors::get_prop(&root, "x").unwrap();
        let base = vec!["x".to_string()];
        let mut seen = Vec::new();
        let mut record = |key: Option<&str>, v: Value, parent: Option<&Value>, path: &[String]| {
            let under_root = parent.map_or(false, |p| p.same(&root));
            seen.push(format!("{}={} {}", key.unwrap_or("-"), path.join("."), under_root));
            v
        };
        walk_from(node, &mut record, Some("x"), Some(&root), &base);
        assert_eq!(seen, vec!["z=x.y.z false", "y=x.y false", "x=x true"]);
    }

    #[test]
    fn test_parent_passed_to_children() {
        let val = Value::from(json!({"p": {"q": 1}}));
        let inner = crate::accessors::get_prop(&val, "p").unwrap();
        walk(val, &mut |key, v, parent, _| {
            if key == Some("q") {
                assert!(parent.unwrap().same(&inner));
            }
            v
        });
    }
}
