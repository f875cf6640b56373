//! Predicates and property access over [`Value`] trees
//!
//! All accessors tolerate absent or non-node inputs: lookups on the wrong
//! kind of value miss instead of failing, and writes become no-ops.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::value::Value;
use std::borrow::Cow;
use std::fmt;

/// A property key: a map name or a list index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(i64),
}

impl Key {
    /// Interpret a value as a key. Only non-empty strings and integral
    /// numbers qualify.
    pub fn from_value(val: &Value) -> Option<Key> {
        match val {
            Value::String(s) if !s.is_empty() => Some(Key::Name(s.clone())),
            Value::Number(_) => val.as_i64().map(Key::Index),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Key::Name(name) if name.is_empty())
    }

    /// Numeric view, parsing numeric names
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(name) => name.parse().ok(),
        }
    }

    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Key::Name(name) => Cow::Borrowed(name),
            Key::Index(i) => Cow::Owned(i.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Index(i as i64)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

pub fn is_node<'a>(val: impl Into<Option<&'a Value>>) -> bool {
    val.into().is_some_and(Value::is_node)
}

pub fn is_map<'a>(val: impl Into<Option<&'a Value>>) -> bool {
    val.into().is_some_and(Value::is_map)
}

pub fn is_list<'a>(val: impl Into<Option<&'a Value>>) -> bool {
    val.into().is_some_and(Value::is_list)
}

pub fn is_func<'a>(val: impl Into<Option<&'a Value>>) -> bool {
    matches!(val.into(), Some(Value::Func(_)))
}

/// Non-empty string or integral number
pub fn is_key<'a>(val: impl Into<Option<&'a Value>>) -> bool {
    val.into().and_then(Key::from_value).is_some()
}

/// Absent, null, empty string, or a node without entries
pub fn is_empty<'a>(val: impl Into<Option<&'a Value>>) -> bool {
    match val.into() {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(node @ (Value::Map(_) | Value::List(_))) => node.len() == 0,
        Some(_) => false,
    }
}

/// Type name of a value as reported in validation messages
pub fn typify<'a>(val: impl Into<Option<&'a Value>>) -> &'static str {
    match val.into() {
        None | Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Func(_)) => "function",
        Some(Value::List(_)) => "array",
        Some(Value::Map(_)) => "object",
    }
}

/// Text form of a key value; anything that is not a key renders empty
pub fn str_key<'a>(val: impl Into<Option<&'a Value>>) -> String {
    match val.into() {
        Some(Value::String(s)) => s.clone(),
        Some(num @ Value::Number(_)) => num
            .as_i64()
            .or_else(|| num.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
            .map(|i| i.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Safely read a property. Maps look up the key's text; lists parse it
/// as an index and bounds-check. Misses return `None`.
pub fn get_prop<'a>(val: impl Into<Option<&'a Value>>, key: impl Into<Key>) -> Option<Value> {
    let key = key.into();
    match val.into()? {
        Value::Map(map) => {
            let name = key.name();
            let found = map.borrow().get(name.as_ref()).cloned();
            found
        }
        Value::List(list) => {
            let index = usize::try_from(key.as_index()?).ok()?;
            let found = list.borrow().get(index).cloned();
            found
        }
        _ => None,
    }
}

/// Write, overwrite or delete a property in place.
///
/// On lists an index at or past the end appends, a negative index
/// prepends, and deleting shifts later elements down. Invalid keys and
/// non-node parents are ignored.
pub fn set_prop(parent: &Value, key: impl Into<Key>, val: Option<Value>) {
    let key = key.into();
    if !key.is_valid() {
        return;
    }

    match parent {
        Value::Map(map) => {
            let name = key.name().into_owned();
            let mut map = map.borrow_mut();
            match val {
                Some(val) => {
                    map.insert(name, val);
                }
                None => {
                    map.shift_remove(&name);
                }
            }
        }
        Value::List(list) => {
            let Some(index) = key.as_index() else {
                return;
            };
            let mut list = list.borrow_mut();
            match val {
                None => {
                    if let Ok(i) = usize::try_from(index) {
                        if i < list.len() {
                            list.remove(i);
                        }
                    }
                }
                Some(val) if index < 0 => list.insert(0, val),
                Some(val) => {
                    let i = index as usize;
                    if i >= list.len() {
                        list.push(val);
                    } else {
                        list[i] = val;
                    }
                }
            }
        }
        _ => {}
    }
}

pub fn has_key<'a>(val: impl Into<Option<&'a Value>>, key: impl Into<Key>) -> bool {
    get_prop(val, key).is_some()
}

/// Keys of a node: sorted names for maps, index strings for lists
pub fn keys_of<'a>(val: impl Into<Option<&'a Value>>) -> Vec<String> {
    match val.into() {
        Some(Value::Map(map)) => {
            let mut keys: Vec<String> = map.borrow().keys().cloned().collect();
            keys.sort();
            keys
        }
        Some(Value::List(list)) => (0..list.borrow().len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}

/// `(key, child)` pairs in [`keys_of`] order
pub fn items<'a>(val: impl Into<Option<&'a Value>>) -> Vec<(String, Value)> {
    match val.into() {
        Some(Value::Map(map)) => {
            let map = map.borrow();
            let mut entries: Vec<(String, Value)> =
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            entries
        }
        Some(Value::List(list)) => list
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Deep copy. Nested nodes become independent; callables keep their
/// identity.
pub fn clone(val: &Value) -> Value {
    match val {
        Value::Map(map) => Value::from_map(
            map.borrow()
                .iter()
                .map(|(k, v)| (k.clone(), clone(v)))
                .collect(),
        ),
        Value::List(list) => Value::from_list(list.borrow().iter().map(clone).collect()),
        other => other.clone(),
    }
}
