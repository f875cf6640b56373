//! By-example transformation
//!
//! A transform spec is a template whose strings reference the source
//! data. The spec is deep-copied, then injected against a store holding
//! the data under `$TOP` alongside the command registry.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod commands;


use crate::accessors::{clone, items, set_prop};
use crate::consts::{SIGIL, TOP};
use crate::inject::{inject_in_place, Modify};
use crate::merge::merge_list;
use crate::value::Value;
use tracing::debug;

/// Transform `data` into the shape of `spec`
pub fn transform<'a>(data: impl Into<Option<&'a Value>>, spec: &Value) -> Option<Value> {
    transform_with(data, spec, None, None)
}

/// Transform with extra store entries and a post-visit hook.
///
/// Entries of `extra` whose names start with `$` are installed as
/// commands (a `null` entry uninstalls a built-in); the rest is merged
/// under the data, which wins on conflicts.
pub fn transform_with<'a>(
    data: impl Into<Option<&'a Value>>,
    spec: &Value,
    extra: Option<&Value>,
    modify: Option<Modify>,
) -> Option<Value> {
    let spec = clone(spec);

    let (extra_commands, extra_data): (Vec<_>, Vec<_>) =
        items(extra).into_iter().partition(|(k, _)| k.starts_with(SIGIL));

    let extra_data = Value::from_map(extra_data.into_iter().collect());
    let data = data.into().map(clone).unwrap_or_else(Value::map);
    let merged = merge_list(&[clone(&extra_data), data]).unwrap_or_default();

    let store = Value::map_of(TOP, merged);
    for (name, command) in commands::registry() {
        set_prop(&store, name, Some(Value::Func(command)));
    }
    for (name, command) in extra_commands {
        let command = (!matches!(command, Value::Null)).then_some(command);
        set_prop(&store, name, command);
    }

    debug!(commands = store.len() - 1, "running transform");
    inject_in_place(&spec, &store, modify, Some(&store))
}
