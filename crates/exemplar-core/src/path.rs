//! Dotted-path resolution against a store
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::get_prop;
use crate::consts::DOT;
use crate::inject::Injection;
use crate::text::pathify_parts;
use crate::value::Value;
use tracing::trace;

/// A path given as dotted text or as explicit segments
#[derive(Debug, Clone, Copy)]
pub enum PathSpec<'a> {
    Text(&'a str),
    Parts(&'a [String]),
}

impl<'a> PathSpec<'a> {
    fn segments(&self) -> Vec<String> {
        match self {
            PathSpec::Text(text) => text.split(DOT).map(str::to_string).collect(),
            PathSpec::Parts(parts) => parts.to_vec(),
        }
    }

    fn reference(&self) -> String {
        match self {
            PathSpec::Text(text) => text.to_string(),
            PathSpec::Parts(parts) => pathify_parts(parts, 0),
        }
    }
}

impl<'a> From<&'a str> for PathSpec<'a> {
    fn from(text: &'a str) -> Self {
        PathSpec::Text(text)
    }
}

impl<'a> From<&'a String> for PathSpec<'a> {
    fn from(text: &'a String) -> Self {
        PathSpec::Text(text)
    }
}

impl<'a> From<&'a [String]> for PathSpec<'a> {
    fn from(parts: &'a [String]) -> Self {
        PathSpec::Parts(parts)
    }
}

impl<'a> From<&'a Vec<String>> for PathSpec<'a> {
    fn from(parts: &'a Vec<String>) -> Self {
        PathSpec::Parts(parts)
    }
}

/// Resolve `path` against `store`. The empty path yields the store.
pub fn get_path<'a>(path: impl Into<PathSpec<'a>>, store: &Value) -> Option<Value> {
    get_path_state(path, store, None, None)
}

/// Resolve `path` with injection context.
///
/// A leading empty segment (`.a.b`) resolves relative to `current`. When
/// the first segment misses at the store root, it is retried under the
/// state's base key. If a state is supplied its handler gets the final
/// say over the resolved value.
pub fn get_path_state<'a>(
    path: impl Into<PathSpec<'a>>,
    store: &Value,
    current: Option<&Value>,
    state: Option<&mut Injection>,
) -> Option<Value> {
    let path = path.into();
    let parts = path.segments();
    let base = state.as_ref().and_then(|s| s.base.clone());

    let val = if parts.is_empty() {
        Some(store.clone())
    } else if parts.len() == 1 && parts[0].is_empty() {
        base.as_deref()
            .and_then(|b| get_prop(store, b))
            .or_else(|| Some(store.clone()))
    } else {
        let (root, index) = if parts[0].is_empty() {
            (current.cloned(), 1)
        } else {
            (Some(store.clone()), 0)
        };

        let part = parts.get(index).map(String::as_str).unwrap_or_default();
        let mut val = get_prop(root.as_ref(), part);
        if val.is_none() && index == 0 {
            if let Some(base) = base.as_deref() {
                val = get_prop(get_prop(root.as_ref(), base).as_ref(), part);
            }
        }
        for part in parts.iter().skip(index + 1) {
            val = match val.as_ref() {
                Some(node) => get_prop(node, part.as_str()),
                None => break,
            };
        }
        val
    };

    match state {
        Some(state) => {
            let handler = state.handler.clone();
            let reference = path.reference();
            trace!(path = %reference, found = val.is_some(), "resolved path");
            handler.call(state, val.as_ref(), current, Some(&reference), store)
        }
        None => val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_empty_path_is_identity() {
        let store = v(json!({"a": 1}));
        assert!(get_path("", &store).unwrap().same(&store));
        assert!(get_path(&Vec::<String>::new(), &store).unwrap().same(&store));
    }

    #[test]
    fn test_dotted_descent() {
        let store = v(json!({"a": {"b": 1, "c": [10, {"d": "x"}]}}));
        assert_eq!(get_path("a.b", &store), Some(v(json!(1))));
        assert_eq!(get_path("a.c.1.d", &store), Some(v(json!("x"))));
        assert_eq!(get_path("a.c.5", &store), None);
        assert_eq!(get_path("a.b.z", &store), None);
        assert_eq!(get_path("q.r", &store), None);
    }

    #[test]
    fn test_segment_paths() {
        let store = v(json!({"a.b": {"c": 2}}));
        let parts = vec!["a.b".to_string(), "c".to_string()];
        assert_eq!(get_path(&parts, &store), Some(v(json!(2))));
        assert_eq!(get_path("a.b.c", &store), None);
    }

    #[test]
    fn test_relative_path_uses_current() {
        let store = v(json!({"a": 1}));
        let current = v(json!({"x": {"y": 5}}));
        assert_eq!(get_path_state(".x.y", &store, Some(&current), None), Some(v(json!(5))));
        assert_eq!(get_path_state(".x.y", &store, None, None), None);
    }
}
