//! Recursive injection of store values into a template
//!
//! Every key of every node is processed in three phases. In `key:pre` the
//! key string itself is injected; a command found there may rewrite the
//! sibling keys or the parent before the value is reached. If the phase
//! yields a key, the value is injected (`val`), and then the key is
//! injected once more (`key:post`) so commands can act on the finished
//! children. Keys containing `$` are visited after plain keys.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod reference;
mod state;


pub use state::{InjectMode, Injection, Modify};

use crate::accessors::{clone, get_prop, keys_of, Key};
use crate::consts::{SIGIL, TOP};
use crate::value::Value;
use reference::inject_str;

/// Inject `store` into a copy of `val` and return the result.
///
/// The result may be a different shape than `val` when a command
/// replaced the whole root.
pub fn inject(val: &Value, store: &Value) -> Option<Value> {
    inject_with(val, store, None, None)
}

/// [`inject`] with a post-visit hook and an explicit starting point for
/// relative references. Without `current` the store itself is used.
pub fn inject_with(
    val: &Value,
    store: &Value,
    modify: Option<Modify>,
    current: Option<&Value>,
) -> Option<Value> {
    inject_in_place(&clone(val), store, modify, current)
}

/// Like [`inject_with`], but rewrites `val` where it stands
pub(crate) fn inject_in_place(
    val: &Value,
    store: &Value,
    modify: Option<Modify>,
    current: Option<&Value>,
) -> Option<Value> {
    let mut state = Injection::root(val, store, modify);
    let current = current
        .cloned()
        .unwrap_or_else(|| Value::map_of(TOP, store.clone()));
    descend(Some(val.clone()), store, Some(current), &mut state)
}

/// Inject one value at the position described by `state`
pub(crate) fn descend(
    val: Option<Value>,
    store: &Value,
    current: Option<Value>,
    state: &mut Injection,
) -> Option<Value> {
    // `current` tracks the data node matching the parent of `val`
    let current = match state.path.len() {
        0 | 1 => current,
        n => get_prop(current.as_ref(), state.path[n - 2].as_str()),
    };
    let parent = state.parent.clone();
    let siblings = list_len(&parent);

    match &val {
        Some(node) if node.is_node() => descend_node(node, store, current.as_ref(), state),
        Some(Value::String(text)) => {
            state.mode = InjectMode::Val;
            state.reset_written();
            let out = inject_str(text, store, current.as_ref(), state);
            if !state.is_claimed() && !state.is_written() {
                state.set_parent_prop(out);
            }
        }
        _ => {}
    }

    let shrunk = matches!(siblings, Some(before) if parent.len() < before);
    if shrunk && state.parent.same(&parent) && !state.is_rewound() {
        state.mark_removed();
    }

    if let Some(modify) = state.modify.clone() {
        if !state.is_claimed() {
            let key = state.key.clone();
            let parent = state.parent.clone();
            let mval = if state.was_removed() {
                None
            } else {
                get_prop(&parent, key.as_str())
            };
            modify(mval.as_ref(), &key, &parent, state, current.as_ref(), store);
        }
    }

    if state.was_removed() {
        None
    } else {
        get_prop(&state.parent, state.key.as_str())
    }
}

fn descend_node(node: &Value, store: &Value, current: Option<&Value>, state: &Injection) {
    let mut node = node.clone();
    let mut keys = node_keys(&node);
    let mut index = 0;
    // List elements removed while visiting, held open until the end so
    // later elements stay aligned with their data
    let mut holes = Vec::new();

    while index < keys.len() {
        let key = keys[index].clone();
        let mut child = state.child(index, std::mem::take(&mut keys), &key, &node);

        if let Some(prekey) = inject_str(&key, store, current, &mut child) {
            let child_val = Key::from_value(&prekey).and_then(|k| get_prop(&child.parent, k));
            child.mode = InjectMode::Val;
            child.val = child_val.clone();
            descend(child_val, store, current.cloned(), &mut child);

            child.mode = InjectMode::KeyPost;
            inject_str(&key, store, current, &mut child);
        }

        if child.is_rewound() || !child.parent.same(&node) {
            holes.clear();
        } else if child.was_removed() {
            if let Value::List(list) = &child.parent {
                let at = index.min(list.borrow().len());
                list.borrow_mut().insert(at, Value::Null);
                holes.push(at);
            }
        }

        index = child.next_index();
        node = child.parent.clone();
        keys = child.keys;
    }

    if let Value::List(list) = &node {
        let mut list = list.borrow_mut();
        for at in holes.into_iter().rev() {
            if at < list.len() {
                list.remove(at);
            }
        }
    }
}

fn list_len(val: &Value) -> Option<usize> {
    val.is_list().then(|| val.len())
}

/// Visit order: plain keys, then command keys, each sorted
fn node_keys(node: &Value) -> Vec<String> {
    let keys = keys_of(node);
    if !node.is_map() {
        return keys;
    }
    let (mut commands, mut plain): (Vec<String>, Vec<String>) =
        keys.into_iter().partition(|k| k.contains(SIGIL));
    plain.append(&mut commands);
    plain
}
