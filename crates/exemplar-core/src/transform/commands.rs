//! Built-in transform commands
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::{clone, get_prop, items, set_prop, str_key, Key};
use crate::consts::{BACKTICK, KEY, KEY_SPEC, META, TOP};
use crate::inject::{inject_in_place, InjectMode, Injection};
use crate::merge::merge_list;
use crate::path::get_path_state;
use crate::value::{Command, Value};
use chrono::{SecondsFormat, Utc};
use tracing::trace;

/// Commands installed in every transform store, by name
pub(super) fn registry() -> Vec<(&'static str, Command)> {
    vec![
        ("$BT", Command::new(backtick)),
        ("$DS", Command::new(dollar)),
        ("$WHEN", Command::new(when)),
        ("$DELETE", Command::new(delete)),
        ("$COPY", Command::new(copy)),
        ("$KEY", Command::new(key)),
        ("$META", Command::new(meta)),
        ("$MERGE", Command::new(merge)),
        ("$EACH", Command::new(each)),
        ("$PACK", Command::new(pack)),
    ]
}

fn backtick(
    _state: &mut Injection,
    _val: Option<&Value>,
    _current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    Some(Value::from(BACKTICK))
}

fn dollar(
    _state: &mut Injection,
    _val: Option<&Value>,
    _current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    Some(Value::from("$"))
}

fn when(
    _state: &mut Injection,
    _val: Option<&Value>,
    _current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    Some(Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)))
}

/// Remove the current key from its parent
fn delete(
    state: &mut Injection,
    _val: Option<&Value>,
    _current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    state.set_parent_prop(None);
    state.claim();
    None
}

/// Copy the same-keyed value from the source data. A scalar source,
/// such as a `$EACH` row over plain values, is copied whole.
fn copy(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    if state.mode != InjectMode::Val {
        return Some(Value::from(state.key.as_str()));
    }
    let out = match current {
        Some(scalar) if !scalar.is_node() => Some(scalar.clone()),
        _ => get_prop(current, state.key.as_str()),
    };
    state.set_parent_prop(out.clone());
    out
}

/// The key of the enclosing node.
///
/// A `` `$KEY` `` field on the parent names a source property to use
/// instead; a stamped `` `$META` ``.KEY comes next.
fn key(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    if state.mode != InjectMode::Val {
        return None;
    }

    if let Some(keyspec) = get_prop(&state.parent, KEY_SPEC) {
        set_prop(&state.parent, KEY_SPEC, None);
        return get_prop(current, Key::from_value(&keyspec)?);
    }

    let meta = get_prop(&state.parent, META);
    if let Some(key) = get_prop(meta.as_ref(), KEY) {
        return Some(key);
    }

    let n = state.path.len();
    (n >= 2).then(|| Value::from(state.path[n - 2].as_str()))
}

/// Metadata is only read by other commands; drop it from the output
fn meta(
    state: &mut Injection,
    _val: Option<&Value>,
    _current: Option<&Value>,
    _reference: Option<&str>,
    _store: &Value,
) -> Option<Value> {
    set_prop(&state.parent, META, None);
    None
}

/// Merge sources into the parent map, with the parent's literal keys
/// taking precedence. An empty source means the whole data root.
fn merge(
    state: &mut Injection,
    _val: Option<&Value>,
    _current: Option<&Value>,
    _reference: Option<&str>,
    store: &Value,
) -> Option<Value> {
    match state.mode {
        InjectMode::KeyPre => Some(Value::from(state.key.as_str())),
        InjectMode::KeyPost => {
            let sources: Vec<Value> = match get_prop(&state.parent, state.key.as_str()) {
                Some(Value::String(s)) if s.is_empty() => get_prop(store, TOP).into_iter().collect(),
                Some(Value::List(list)) => list.borrow().clone(),
                Some(other) => vec![other],
                None => Vec::new(),
            };
            state.set_parent_prop(None);

            let mut objs = Vec::with_capacity(sources.len() + 2);
            objs.push(state.parent.clone());
            objs.extend(sources);
            objs.push(clone(&state.parent));
            trace!(sources = objs.len() - 2, path = ?state.path, "merging into parent");
            merge_list(&objs);

            Some(Value::from(state.key.as_str()))
        }
        InjectMode::Val => None,
    }
}

/// `["`$EACH`", source-path, template]`: one template copy per source
/// element, injected against that element.
fn each(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    store: &Value,
) -> Option<Value> {
    state.keys.truncate(1);
    if state.mode != InjectMode::Val {
        return None;
    }
    state.claim();

    let (target, tkey) = state.grandparent()?;
    let template = get_prop(&state.parent, 2).unwrap_or_default();
    let source = resolve_source(get_prop(&state.parent, 1).as_ref(), store, current);

    let rows = Value::list();
    let values = Value::list();
    match &source {
        Some(Value::List(list)) => {
            for elem in list.borrow().iter() {
                set_prop(&rows, rows.len(), Some(clone(&template)));
                set_prop(&values, values.len(), Some(elem.clone()));
            }
        }
        Some(map @ Value::Map(_)) => {
            for (k, elem) in items(map) {
                let row = clone(&template);
                if row.is_map() {
                    set_prop(&row, META, Some(Value::map_of(KEY, Value::from(k))));
                }
                set_prop(&rows, rows.len(), Some(row));
                set_prop(&values, values.len(), Some(elem));
            }
        }
        _ => {}
    }

    trace!(rows = rows.len(), into = %tkey, "expanding $EACH");
    let tcurrent = Value::map_of(TOP, values);
    let out = inject_in_place(&rows, store, state.modify.clone(), Some(&tcurrent)).unwrap_or(rows);

    set_prop(&target, tkey.as_str(), Some(out.clone()));
    state.parent = out.clone();
    get_prop(&out, 0)
}

/// `{"`$PACK`": [source-path, template]}`: a map of template copies keyed
/// by each source element's key field.
fn pack(
    state: &mut Injection,
    _val: Option<&Value>,
    current: Option<&Value>,
    _reference: Option<&str>,
    store: &Value,
) -> Option<Value> {
    if state.mode != InjectMode::KeyPre {
        return None;
    }

    let args = get_prop(&state.parent, state.key.as_str()).filter(Value::is_list)?;
    if args.len() < 2 {
        return None;
    }
    let (target, tkey) = state.grandparent()?;

    let template = clone(&get_prop(&args, 1).unwrap_or_default());
    let key_field = get_prop(&template, KEY_SPEC);
    set_prop(&template, KEY_SPEC, None);

    let elems: Vec<Value> = match resolve_source(get_prop(&args, 0).as_ref(), store, current) {
        Some(Value::List(list)) => list.borrow().clone(),
        Some(map @ Value::Map(_)) => items(&map)
            .into_iter()
            .map(|(k, elem)| stamp_key(elem, k))
            .collect(),
        _ => return None,
    };

    let rows = Value::map();
    let values = Value::map();
    for elem in elems {
        let name = match &key_field {
            Some(field) => Key::from_value(field).and_then(|k| get_prop(&elem, k)),
            None => get_prop(get_prop(&elem, META).as_ref(), KEY),
        };
        let name = str_key(name.as_ref());
        if name.is_empty() {
            continue;
        }

        let row = clone(&template);
        if row.is_map() {
            set_prop(&row, META, get_prop(&elem, META));
        }
        set_prop(&rows, name.as_str(), Some(row));
        set_prop(&values, name.as_str(), Some(elem));
    }

    trace!(rows = rows.len(), into = %tkey, "expanding $PACK");
    let tcurrent = Value::map_of(TOP, values);
    let out = inject_in_place(&rows, store, state.modify.clone(), Some(&tcurrent));
    set_prop(&target, tkey.as_str(), out);
    None
}

/// Copy of a map element carrying its source key in `` `$META` ``.KEY
fn stamp_key(elem: Value, key: String) -> Value {
    if !elem.is_map() {
        return elem;
    }
    let elem = clone(&elem);
    let meta = get_prop(&elem, META)
        .filter(Value::is_map)
        .unwrap_or_else(Value::map);
    set_prop(&meta, KEY, Some(Value::from(key)));
    set_prop(&elem, META, Some(meta));
    elem
}

/// Resolve a `$EACH`/`$PACK` source path, written bare or as a whole
/// reference, against the data root.
fn resolve_source(path: Option<&Value>, store: &Value, current: Option<&Value>) -> Option<Value> {
    let path = path?.as_str()?;
    let path = path
        .strip_prefix(BACKTICK)
        .and_then(|p| p.strip_suffix(BACKTICK))
        .unwrap_or(path);
    let root = get_prop(store, TOP).unwrap_or_else(|| store.clone());
    get_path_state(path, &root, current, None)
}
