//! Backtick reference resolution inside strings
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::consts::SIGIL;
use crate::path::get_path_state;
use crate::text::stringify;
use crate::value::Value;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::trace;

use super::state::{InjectMode, Injection};

static FULL_REFERENCE: OnceLock<Regex> = OnceLock::new();
static PARTIAL_REFERENCE: OnceLock<Regex> = OnceLock::new();

fn full_reference() -> &'static Regex {
    FULL_REFERENCE.get_or_init(|| Regex::new(r"^`(\$[A-Z]+|[^`]+)[0-9]*`$").unwrap())
}

fn partial_reference() -> &'static Regex {
    PARTIAL_REFERENCE.get_or_init(|| Regex::new(r"`([^`]+)`").unwrap())
}

/// Replace the `$BT` and `$DS` escapes in a reference body
fn unescape(reference: &str) -> String {
    if reference.len() > 3 {
        reference.replace("$BT", "`").replace("$DS", "$")
    } else {
        reference.to_string()
    }
}

/// Inject references into `text`.
///
/// A string that is exactly one reference resolves to the typed value it
/// names. Otherwise every embedded reference is rendered to text and
/// spliced in, and the state's handler sees the finished string.
pub(crate) fn inject_str(
    text: &str,
    store: &Value,
    current: Option<&Value>,
    state: &mut Injection,
) -> Option<Value> {
    if text.is_empty() {
        return Some(Value::from(""));
    }

    if let Some(caps) = full_reference().captures(text) {
        state.full = true;
        let reference = unescape(&caps[1]);
        return get_path_state(reference.as_str(), store, current, Some(state));
    }

    let spliced = partial_reference()
        .replace_all(text, |caps: &Captures| {
            let reference = unescape(&caps[1]);
            state.full = false;
            match get_path_state(reference.as_str(), store, current, Some(&mut *state)) {
                None => String::new(),
                Some(Value::String(s)) => s,
                Some(node) if node.is_node() => node.to_json_string(),
                Some(other) => stringify(&other, None),
            }
        })
        .into_owned();

    state.full = true;
    let handler = state.handler.clone();
    handler.call(state, Some(&Value::from(spliced)), current, Some(text), store)
}

/// Resolution handler installed on every root state.
///
/// Callables reached through a `$NAME` reference are invoked as commands.
/// Any other value found by a whole-string reference in value mode is
/// written straight into the parent, keeping its type.
pub(crate) fn inject_handler(
    state: &mut Injection,
    val: Option<&Value>,
    current: Option<&Value>,
    reference: Option<&str>,
    store: &Value,
) -> Option<Value> {
    let is_command = reference.map_or(true, |r| r.starts_with(SIGIL));

    match val {
        Some(Value::Func(command)) if is_command => {
            trace!(
                command = reference.unwrap_or_default(),
                mode = %state.mode,
                key = %state.key,
                "dispatching command"
            );
            command.call(state, val, current, reference, store)
        }
        _ => {
            if state.mode == InjectMode::Val && state.full {
                state.set_parent_prop(val.cloned());
            }
            val.cloned()
        }
    }
}
