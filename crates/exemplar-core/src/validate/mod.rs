//! Validation by example
//!
//! A validation spec is a transform spec read as a shape. Literal values
//! are defaults that also fix the required type, `$`-commands check a
//! value in place, and maps are closed unless they are empty or carry
//! `` `$OPEN` ``: true. Errors are collected rather than raised while the
//! spec is walked.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod commands;


use crate::accessors::{get_prop, has_key, is_empty, items, keys_of, set_prop, typify};
use crate::consts::{ERRS, OPEN, SIGIL};
use crate::error::{Error, Result};
use crate::inject::{Injection, Modify};
use crate::merge::merge_list;
use crate::text::pathify_parts;
use crate::transform::transform_with;
use crate::value::Value;
use std::rc::Rc;
use tracing::debug;

use commands::invalid_type_msg;

/// Validate `data` against `spec`, failing with every collected error
pub fn validate<'a>(data: impl Into<Option<&'a Value>>, spec: &Value) -> Result<Option<Value>> {
    validate_with(data, spec, None, None)
}

/// Validate with extra store entries.
///
/// When `collect` is given, errors are appended to it and the call
/// succeeds; otherwise any error fails the call with
/// [`Error::Validation`].
pub fn validate_with<'a>(
    data: impl Into<Option<&'a Value>>,
    spec: &Value,
    extra: Option<&Value>,
    collect: Option<&mut Vec<String>>,
) -> Result<Option<Value>> {
    let errs = Value::list();
    let store = Value::map();
    for (name, entry) in commands::registry() {
        set_prop(&store, name, Some(entry));
    }
    for (key, val) in items(extra) {
        set_prop(&store, key.as_str(), Some(val));
    }
    set_prop(&store, ERRS, Some(errs.clone()));

    let modify: Modify = Rc::new(validation);
    let out = transform_with(data, spec, Some(&store), Some(modify));

    let errors: Vec<String> = items(&errs)
        .into_iter()
        .map(|(_, e)| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
        .collect();
    debug!(errors = errors.len(), "validation finished");

    match collect {
        Some(collect) => {
            collect.extend(errors);
            Ok(out)
        }
        None if errors.is_empty() => Ok(out),
        None => Err(Error::validation(errors)),
    }
}

/// Validate, appending errors to `errs` instead of failing
pub fn validate_collect<'a>(
    data: impl Into<Option<&'a Value>>,
    spec: &Value,
    extra: Option<&Value>,
    errs: &mut Vec<String>,
) -> Option<Value> {
    validate_with(data, spec, extra, Some(errs)).ok().flatten()
}

/// Check one visited spec value against the data at the same key
fn validation(
    pval: Option<&Value>,
    key: &str,
    parent: &Value,
    state: &mut Injection,
    current: Option<&Value>,
    _store: &Value,
) {
    let Some(cval) = get_prop(current, key) else {
        return;
    };
    // A failed check already reported and removed the value
    let Some(pval) = pval else {
        let path = pathify_parts(&state.path, 1);
        set_prop(&state.meta, path.as_str(), Some(Value::Bool(true)));
        return;
    };
    if matches!(pval, Value::String(s) if s.contains(SIGIL)) {
        return;
    }

    let ptype = typify(pval);
    if ptype != typify(&cval) {
        state.push_err(invalid_type_msg(&state.path, ptype, Some(&cval)));
        return;
    }

    match &cval {
        Value::Map(_) => {
            let open = get_prop(pval, OPEN).and_then(|o| o.as_bool()) == Some(true);
            set_prop(pval, OPEN, None);

            if open || keys_of(pval).is_empty() {
                merge_list(&[pval.clone(), cval.clone()]);
            } else {
                let unexpected: Vec<String> = keys_of(&cval)
                    .into_iter()
                    .filter(|k| !has_key(pval, k.as_str()) && !reported(state, k))
                    .collect();
                if !unexpected.is_empty() {
                    state.push_err(format!(
                        "Unexpected keys at {}: {}",
                        pathify_parts(&state.path, 1),
                        unexpected.join(", ")
                    ));
                }
            }
        }
        // An empty spec list is open like an empty map
        Value::List(_) if is_empty(pval) => set_prop(parent, key, Some(cval.clone())),
        Value::List(_) => {}
        _ => set_prop(parent, key, Some(cval.clone())),
    }
}

/// Whether the data key `key` under the current node already failed a check
fn reported(state: &Injection, key: &str) -> bool {
    let mut path = state.path.clone();
    path.push(key.to_string());
    has_key(&state.meta, pathify_parts(&path, 1).as_str())
}
