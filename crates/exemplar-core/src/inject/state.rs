//! Per-key traversal state threaded through injection
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::accessors::{get_prop, set_prop};
use crate::consts::{ERRS, TOP};
use crate::value::{Command, Value};
use std::fmt;
use std::rc::Rc;

use super::reference::inject_handler;

/// Phase of the injector for the key being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectMode {
    /// Before the value is visited; the key itself is being injected
    KeyPre,
    /// The value is being injected
    Val,
    /// After the value has been visited
    KeyPost,
}

impl InjectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectMode::KeyPre => "key:pre",
            InjectMode::Val => "val",
            InjectMode::KeyPost => "key:post",
        }
    }
}

impl fmt::Display for InjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-visit hook: `(value, key, parent, state, current, store)`
pub type Modify = Rc<dyn Fn(Option<&Value>, &str, &Value, &mut Injection, Option<&Value>, &Value)>;

/// Traversal context for one key of one node.
///
/// Each key gets its own state; the error list and `meta` map are shared
/// by reference across the whole call so commands can report upward.
pub struct Injection {
    pub mode: InjectMode,
    /// Whether the string being injected is a single whole reference
    pub full: bool,
    /// Index of `key` within `keys`
    pub key_i: usize,
    /// Sibling keys; commands may truncate or extend this
    pub keys: Vec<String>,
    pub key: String,
    pub val: Option<Value>,
    /// Node containing `key`
    pub parent: Value,
    pub path: Vec<String>,
    /// Ancestor nodes, outermost first, ending with `parent`
    pub nodes: Vec<Value>,
    pub handler: Command,
    /// Shared error list
    pub errs: Value,
    pub meta: Value,
    pub base: Option<String>,
    pub modify: Option<Modify>,
    rewind: bool,
    claimed: bool,
    written: bool,
    removed: bool,
}

impl Injection {
    /// State for the top of a call, wrapping `val` in a virtual parent
    pub fn root(val: &Value, store: &Value, modify: Option<Modify>) -> Self {
        let parent = Value::map_of(TOP, val.clone());
        let errs = get_prop(store, ERRS)
            .filter(Value::is_list)
            .unwrap_or_else(Value::list);

        Self {
            mode: InjectMode::Val,
            full: false,
            key_i: 0,
            keys: vec![TOP.to_string()],
            key: TOP.to_string(),
            val: Some(val.clone()),
            parent: parent.clone(),
            path: vec![TOP.to_string()],
            nodes: vec![parent],
            handler: Command::new(inject_handler),
            errs,
            meta: Value::map(),
            base: Some(TOP.to_string()),
            modify,
            rewind: false,
            claimed: false,
            written: false,
            removed: false,
        }
    }

    /// State for `key` of `node`, which sits at this state's position
    pub fn child(&self, key_i: usize, keys: Vec<String>, key: &str, node: &Value) -> Self {
        let mut path = self.path.clone();
        path.push(key.to_string());
        let mut nodes = self.nodes.clone();
        nodes.push(node.clone());

        Self {
            mode: InjectMode::KeyPre,
            full: false,
            key_i,
            keys,
            key: key.to_string(),
            val: None,
            parent: node.clone(),
            path,
            nodes,
            handler: self.handler.clone(),
            errs: self.errs.clone(),
            meta: self.meta.clone(),
            base: self.base.clone(),
            modify: self.modify.clone(),
            rewind: false,
            claimed: false,
            written: false,
            removed: false,
        }
    }

    /// Record a validation or usage error
    pub fn push_err(&self, message: impl Into<String>) {
        set_prop(&self.errs, self.errs.len(), Some(Value::from(message.into())));
    }

    /// Snapshot of the shared error list
    pub fn errors(&self) -> Vec<String> {
        match &self.errs {
            Value::List(list) => list
                .borrow()
                .iter()
                .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Write `val` under this state's key in its parent. The injector
    /// then leaves the slot alone for the rest of the visit.
    pub fn set_parent_prop(&mut self, val: Option<Value>) {
        set_prop(&self.parent, self.key.as_str(), val);
        self.written = true;
    }

    /// The node holding `parent`, and the key it is held under
    pub fn grandparent(&self) -> Option<(Value, String)> {
        let key = self.path.len().checked_sub(2).map(|i| self.path[i].clone())?;
        let node = match self.nodes.len() {
            0 => return None,
            1 => self.nodes[0].clone(),
            n => self.nodes[n - 2].clone(),
        };
        Some((node, key))
    }

    /// Mark the current leaf as handled by a command: its result is
    /// neither written back nor passed to `modify`.
    pub fn claim(&mut self) {
        self.claimed = true;
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// Resume sibling iteration at `index` instead of advancing. Implies
    /// [`Injection::claim`].
    pub fn restart_at(&mut self, index: usize) {
        self.key_i = index;
        self.rewind = true;
        self.claimed = true;
    }

    /// Stop iterating the remaining siblings
    pub fn stop_siblings(&mut self) {
        self.key_i = self.keys.len();
    }

    /// Forget earlier writes before the value is injected again
    pub(crate) fn reset_written(&mut self) {
        self.written = false;
    }

    pub(crate) fn is_written(&self) -> bool {
        self.written
    }

    /// Record that visiting this key removed its element from a list
    /// parent, shifting the later siblings down
    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub(crate) fn was_removed(&self) -> bool {
        self.removed
    }

    /// Whether iteration resumes at an explicit index
    pub(crate) fn is_rewound(&self) -> bool {
        self.rewind
    }

    /// Index of the next sibling to visit
    pub(crate) fn next_index(&self) -> usize {
        if self.rewind {
            self.key_i
        } else {
            self.key_i + 1
        }
    }
}

impl fmt::Debug for Injection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injection")
            .field("mode", &self.mode)
            .field("full", &self.full)
            .field("key_i", &self.key_i)
            .field("keys", &self.keys)
            .field("key", &self.key)
            .field("path", &self.path)
            .field("base", &self.base)
            .field("errs", &self.errs)
            .finish_non_exhaustive()
    }
}
