//! Validator commands
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::{clone, get_prop, items, keys_of, set_prop, typify};
use crate::consts::{ERRS, SIGIL, TOP};
use crate::inject::{InjectMode, Injection};
use crate::text::{pathify_parts, stringify};
use crate::value::{Command, Value};
use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::validate_collect;

static COMMAND_TOKEN: OnceLock<Regex> = OnceLock::new();

/// Store entries for a validation run. Transform commands that rewrite
/// data are switched off with `null`.
pub(super) fn registry() -> Vec<(&'static str, Value)> {
    vec![
        ("$DELETE", Value::Null),
        ("$COPY", Value::Null),
        ("$KEY", Value::Null),
        ("$META", Value::Null),
        ("$MERGE", Value::Null),
        ("$EACH", Value::Null),
        ("$PACK", Value::Null),
        ("$STRING", Value::Func(Command::new(string))),
        ("$NUMBER", Value::Func(type_check("number"))),
        ("$BOOLEAN", Value::Func(type_check("boolean"))),
        ("$OBJECT", Value::Func(type_check("object"))),
        ("$ARRAY", Value::Func(type_check("array"))),
        ("$FUNCTION", Value::Func(type_check("function"))),
        ("$ANY", Value::Func(Command::new(any))),
        ("$CHILD", Value::Func(Command::new(child))),
        ("$ONE", Value::Func(Command::new(one))),
        ("$EXACT", Value::Func(Command::new(exact))),
    ]
}

pub(super) fn invalid_type_msg(path: &[String], expected: &str, found: Option<&Value>) -> String {
    let found = match found {
        Some(val) => format!("{}: {}", typify(val), stringify(val, None)),
        None => "no value".to_string(),
    };
    format!("Expected {expected} at {}, found {found}", pathify_parts(path, 1))
}

/// Path of the node holding the current key
fn parent_path(state: &Injection) -> &[String] {
    &state.path[..state.path.len().saturating_sub(1)]
}

fn type_check(expected: &'static str) -> Command {
    Command::new(move |state, _val, current, _reference, _store| {
        let out = get_prop(current, state.key.as_str());
        if typify(out.as_ref()) != expected {
            state.push_err(invalid_type_msg(&state.path, expected, out.as_ref()));
            return None;
        }
        out
    })
}

fn string(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    let out = get_prop(current, state.key.as_str());
    match out.as_ref().and_then(Value::as_str).map(str::is_empty) {
        Some(false) => out,
        Some(true) => {
            state.push_err(format!("Empty string at {}", pathify_parts(&state.path, 1)));
            None
        }
        None => {
            state.push_err(invalid_type_msg(&state.path, "string", out.as_ref()));
            None
        }
    }
}

fn any(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    get_prop(current, state.key.as_str())
}

/// Expand one template per data entry.
///
/// As a map key (`{"`$CHILD`": template}`) a copy is added for every key
/// of the data map. As the head of a list (`["`$CHILD`", template]`) the
/// list is rebuilt with one copy per data element and traversal restarts
/// at its first element.
fn child(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    match state.mode {
        InjectMode::KeyPre => {
            let template = get_prop(&state.parent, state.key.as_str()).unwrap_or_default();
            let n = state.path.len();
            let data = match n {
                0 | 1 => None,
                _ => get_prop(current, state.path[n - 2].as_str()),
            };

            let data = match data {
                None => Value::map(),
                Some(data) if data.is_map() => data,
                Some(data) => {
                    state.push_err(invalid_type_msg(parent_path(state), "object", Some(&data)));
                    drop_from_grandparent(state);
                    return None;
                }
            };

            for key in keys_of(&data) {
                set_prop(&state.parent, key.as_str(), Some(clone(&template)));
                state.keys.push(key);
            }
            state.set_parent_prop(None);
            None
        }
        InjectMode::Val => {
            let Value::List(list) = state.parent.clone() else {
                state.push_err("Invalid $CHILD as value");
                return None;
            };
            let template = get_prop(&state.parent, 1).unwrap_or_default();

            match current {
                None => {
                    list.borrow_mut().clear();
                    state.keys.clear();
                    state.claim();
                }
                Some(data) if !data.is_list() => {
                    state.push_err(invalid_type_msg(parent_path(state), "array", Some(data)));
                    drop_from_grandparent(state);
                    state.stop_siblings();
                    state.claim();
                }
                Some(data) => {
                    let count = data.len();
                    *list.borrow_mut() = (0..count).map(|_| clone(&template)).collect();
                    state.keys = (0..count).map(|i| i.to_string()).collect();
                    state.restart_at(0);
                }
            }
            None
        }
        InjectMode::KeyPost => None,
    }
}

/// `["`$ONE`", shape, ...]`: the data must validate against at least
/// one of the shapes.
fn one(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    store: &Value,
) -> Option<Value> {
    let shapes = alternatives(state, "$ONE")?;
    let Some((target, tkey)) = state.grandparent() else {
        return None;
    };

    let extra = forwarded_commands(store);
    for shape in &shapes {
        let mut errs = Vec::new();
        let out = validate_collect(current, shape, Some(&extra), &mut errs);
        if errs.is_empty() {
            set_prop(&target, tkey.as_str(), out);
            return None;
        }
    }

    set_prop(&target, tkey.as_str(), None);
    let prefix = if shapes.len() > 1 { "one of " } else { "" };
    let expected = format!("{prefix}{}", describe(&shapes));
    state.push_err(invalid_type_msg(parent_path(state), &expected, current));
    None
}

/// `["`$EXACT`", value, ...]`: the data must equal one of the values
fn exact(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    let values = alternatives(state, "$EXACT")?;
    let Some((target, tkey)) = state.grandparent() else {
        return None;
    };

    if values.iter().any(|val| current == Some(val)) {
        set_prop(&target, tkey.as_str(), current.cloned());
        return None;
    }

    set_prop(&target, tkey.as_str(), None);
    let prefix = if values.len() > 1 { "one of " } else { "" };
    let expected = format!("exactly equal to {prefix}{}", describe(&values));
    state.push_err(invalid_type_msg(parent_path(state), &expected, current));
    None
}

/// Arguments following a list-head validator. Claims the list so its
/// remaining elements are not visited.
fn alternatives(state: &mut Injection, name: &str) -> Option<Vec<Value>> {
    if state.mode != InjectMode::Val {
        return None;
    }
    if !state.parent.is_list() || state.key_i != 0 {
        state.push_err(format!(
            "The {name} validator at field {} must be the first element of an array.",
            pathify_parts(parent_path(state), 1)
        ));
        return None;
    }

    state.stop_siblings();
    state.claim();

    let args: Vec<Value> = items(&state.parent).into_iter().skip(1).map(|(_, v)| v).collect();
    if args.is_empty() {
        state.push_err(format!(
            "The {name} validator at field {} must have at least one argument.",
            pathify_parts(parent_path(state), 1)
        ));
        return None;
    }
    Some(args)
}

fn drop_from_grandparent(state: &Injection) {
    if let Some((target, tkey)) = state.grandparent() {
        set_prop(&target, tkey.as_str(), None);
    }
}

/// Commands of the running store, to carry into nested validations
fn forwarded_commands(store: &Value) -> Value {
    let extra = Value::map();
    for (key, val) in items(store) {
        if key.starts_with(SIGIL) && key != TOP && key != ERRS {
            set_prop(&extra, key.as_str(), Some(val));
        }
    }
    extra
}

/// Human list of alternatives, with `` `$NAME` `` tokens as type names
fn describe(vals: &[Value]) -> String {
    let joined = vals
        .iter()
        .map(|v| stringify(v, None))
        .collect::<Vec<_>>()
        .join(", ");
    let token = COMMAND_TOKEN.get_or_init(|| Regex::new(r"`\$([A-Z]+)`").unwrap());
    token
        .replace_all(&joined, |caps: &Captures| caps[1].to_lowercase())
        .into_owned()
}
