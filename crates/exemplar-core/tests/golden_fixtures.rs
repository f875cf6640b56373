//! Fixture corpus tests for the engine
//!
//! Each group of the bundled corpus is replayed through the matching
//! engine operation.


use exemplar_core::{
    esc_re, esc_url, get_path_state, get_prop, inject, is_empty, is_key, is_node, join_url, merge,
    pathify, stringify, transform, typify, validate, Key, Value,
};
use exemplar_golden::{FixtureEntry, GoldenConfig, GoldenTestRunner};
use serde_json::json;
use test_support::{opt, out};

type Outcome = Result<serde_json::Value, String>;

fn run(group: &str, name: &str, subject: impl FnMut(&FixtureEntry) -> Outcome) {
    let runner = GoldenTestRunner::new(GoldenConfig::from_env());
    if let Err(err) = runner.run_test(group, name, subject) {
        panic!("{}", err);
    }
}

/// The entry input as an engine value
fn input(entry: &FixtureEntry) -> Option<Value> {
    opt(entry.input.as_ref())
}

fn text(entry: &FixtureEntry) -> String {
    entry
        .input
        .as_ref()
        .and_then(|i| i.as_str())
        .unwrap_or_default()
        .to_string()
}

#[test]
fn minor_stringify() {
    run("minor", "stringify", |entry| {
        let max = entry.field("max").and_then(|m| m.as_u64()).map(|m| m as usize);
        Ok(json!(stringify(opt(entry.field("val")).as_ref(), max)))
    });
}

#[test]
fn minor_typify() {
    run("minor", "typify", |entry| Ok(json!(typify(input(entry).as_ref()))));
}

#[test]
fn minor_pathify() {
    run("minor", "pathify", |entry| {
        let from = entry.field("from").and_then(|f| f.as_u64()).unwrap_or(0) as usize;
        Ok(json!(pathify(opt(entry.field("path")).as_ref(), from)))
    });
}

#[test]
fn minor_escapes() {
    run("minor", "escre", |entry| Ok(json!(esc_re(&text(entry)))));
    run("minor", "escurl", |entry| Ok(json!(esc_url(&text(entry)))));
}

#[test]
fn minor_joinurl() {
    run("minor", "joinurl", |entry| {
        let parts: Vec<String> = entry
            .input
            .as_ref()
            .and_then(|i| i.as_array())
            .map(|parts| parts.iter().filter_map(|p| p.as_str().map(str::to_string)).collect())
            .unwrap_or_default();
        Ok(json!(join_url(parts)))
    });
}

#[test]
fn minor_getprop() {
    run("minor", "getprop", |entry| {
        let key = entry
            .field("key")
            .map(Value::from)
            .and_then(|k| Key::from_value(&k))
            .ok_or_else(|| "fixture key is not a key".to_string())?;
        Ok(out(get_prop(opt(entry.field("val")).as_ref(), key)))
    });
}

#[test]
fn minor_predicates() {
    run("minor", "isnode", |entry| Ok(json!(is_node(input(entry).as_ref()))));
    run("minor", "isempty", |entry| Ok(json!(is_empty(input(entry).as_ref()))));
    run("minor", "iskey", |entry| Ok(json!(is_key(input(entry).as_ref()))));
}

fn getpath_subject(entry: &FixtureEntry) -> Outcome {
    let path = entry.field("path").and_then(|p| p.as_str()).unwrap_or_default();
    let store = opt(entry.field("store")).unwrap_or_default();
    let current = opt(entry.field("current"));
    Ok(out(get_path_state(path, &store, current.as_ref(), None)))
}

#[test]
fn getpath_basic() {
    run("getpath", "basic", getpath_subject);
}

#[test]
fn getpath_current() {
    run("getpath", "current", getpath_subject);
}

#[test]
fn merge_basic() {
    run("merge", "basic", |entry| {
        Ok(out(input(entry).and_then(|objs| merge(&objs))))
    });
}

#[test]
fn inject_basic() {
    run("inject", "basic", |entry| {
        let val = opt(entry.field("val")).unwrap_or_default();
        let store = opt(entry.field("store")).unwrap_or_default();
        Ok(out(inject(&val, &store)))
    });
}

fn transform_subject(entry: &FixtureEntry) -> Outcome {
    let data = opt(entry.field("data"));
    let spec = opt(entry.field("spec")).unwrap_or_default();
    Ok(out(transform(data.as_ref(), &spec)))
}

#[test]
fn transform_groups() {
    for name in ["paths", "delete", "copy", "key", "merge", "each", "pack", "escape"] {
        run("transform", name, transform_subject);
    }
}

fn validate_subject(entry: &FixtureEntry) -> Outcome {
    let data = opt(entry.field("data"));
    let spec = opt(entry.field("spec")).unwrap_or_default();
    validate(data.as_ref(), &spec)
        .map(out)
        .map_err(|err| err.to_string())
}

#[test]
fn validate_groups() {
    for name in ["basic", "open", "child", "one"] {
        run("validate", name, validate_subject);
    }
}

#[test]
fn corpus_is_complete() {
    let runner = GoldenTestRunner::new(GoldenConfig::from_env());
    let tests = runner.list_tests().unwrap();
    for id in ["getpath/basic", "merge/basic", "inject/basic", "transform/each", "validate/child"] {
        assert!(tests.iter().any(|t| t == id), "missing fixture {id}");
    }
}
