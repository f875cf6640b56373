//! Dynamic value model shared by every engine operation
//!
//! Nodes (maps and lists) live in shared, interior-mutable cells so the
//! injector can rewrite a structure in place while ancestor frames still
//! hold references to it. Cloning a [`Value`] copies the reference; use
//! [`crate::accessors::clone`] for an independent deep copy.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::inject::Injection;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Insertion-ordered map node contents
pub type Map = IndexMap<String, Value>;

/// List node contents
pub type List = Vec<Value>;

/// Signature shared by commands and resolution handlers:
/// `(state, value, current, reference, store) -> value`
pub type CommandFn =
    dyn Fn(&mut Injection, Option<&Value>, Option<&Value>, Option<&str>, &Value) -> Option<Value>;

/// A callable stored inside a value tree
#[derive(Clone)]
pub struct Command(Rc<CommandFn>);

impl Command {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Injection, Option<&Value>, Option<&Value>, Option<&str>, &Value) -> Option<Value>
            + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call(
        &self,
        state: &mut Injection,
        val: Option<&Value>,
        current: Option<&Value>,
        reference: Option<&str>,
        store: &Value,
    ) -> Option<Value> {
        (self.0)(state, val, current, reference, store)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Command) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<command>")
    }
}

/// A JSON-like value that may also carry callables
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Rc<RefCell<List>>),
    Map(Rc<RefCell<Map>>),
    Func(Command),
}

impl Value {
    /// New empty map node
    pub fn map() -> Self {
        Self::from_map(Map::new())
    }

    /// New empty list node
    pub fn list() -> Self {
        Self::from_list(List::new())
    }

    pub fn from_map(map: Map) -> Self {
        Value::Map(Rc::new(RefCell::new(map)))
    }

    pub fn from_list(list: List) -> Self {
        Value::List(Rc::new(RefCell::new(list)))
    }

    /// Single-entry map node
    pub fn map_of(key: impl Into<String>, val: Value) -> Self {
        let mut map = Map::new();
        map.insert(key.into(), val);
        Self::from_map(map)
    }

    /// Wrap a closure as a callable value
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut Injection, Option<&Value>, Option<&Value>, Option<&str>, &Value) -> Option<Value>
            + 'static,
    {
        Value::Func(Command::new(f))
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Value::Map(_) | Value::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Integral numbers only; floats with a fractional part yield `None`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }

    /// Element count of a node, zero otherwise
    pub fn len(&self) -> usize {
        match self {
            Value::Map(map) => map.borrow().len(),
            Value::List(list) => list.borrow().len(),
            _ => 0,
        }
    }

    /// True when both values are the same node or callable
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Convert to a plain JSON value. Callables are dropped from maps and
    /// rendered as `null` elsewhere.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Func(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(list) => {
                serde_json::Value::Array(list.borrow().iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.borrow()
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Func(_)))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Compact JSON text
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse JSON text into a value
    pub fn from_json_str(text: &str) -> Result<Value> {
        serde_json::from_str::<serde_json::Value>(text)
            .map(Value::from)
            .map_err(|e| Error::Json {
                message: format!("Failed to parse value: {}", e),
                source: e,
            })
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Func(a), Value::Func(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Func(command) => command.fmt(f),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Func(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(list) => {
                let list = list.borrow();
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let map = map.borrow();
                let entries: Vec<_> = map
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Func(_)))
                    .collect();
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::from_list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::from_map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number((n as u64).into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::from_map(map)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::from_list(list)
    }
}

impl From<Command> for Value {
    fn from(command: Command) -> Self {
        Value::Func(command)
    }
}
