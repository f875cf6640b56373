//! Structural comparison of fixture outputs with textual diffs
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use colored::*;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Tolerance for floating point comparison
    pub float_tolerance: f64,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            float_tolerance: 1e-9,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    /// Whether the values match
    pub matches: bool,

    /// Human-readable diff output, empty on a match
    pub diff_output: String,

    /// Paths that differ
    pub differing_paths: Vec<String>,
}

/// Engine for comparing JSON values
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Compare an expected value with an actual one
    pub fn compare(&self, expected: &Value, actual: &Value) -> DiffResult {
        if self.values_match(expected, actual) {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                differing_paths: Vec::new(),
            };
        }

        let mut differing_paths = Vec::new();
        self.collect_diff_paths(expected, actual, String::new(), &mut differing_paths);

        DiffResult {
            matches: false,
            diff_output: self.generate_diff_output(expected, actual),
            differing_paths,
        }
    }

    /// Structural equality; map key order is ignored and numbers match
    /// within the float tolerance
    pub fn values_match(&self, expected: &Value, actual: &Value) -> bool {
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                exp.len() == act.len()
                    && exp
                        .iter()
                        .all(|(key, e)| act.get(key).is_some_and(|a| self.values_match(e, a)))
            }
            (Value::Array(exp), Value::Array(act)) => {
                exp.len() == act.len()
                    && exp.iter().zip(act).all(|(e, a)| self.values_match(e, a))
            }
            (Value::Number(exp), Value::Number(act)) => match (exp.as_f64(), act.as_f64()) {
                (Some(e), Some(a)) => (e - a).abs() <= self.options.float_tolerance,
                _ => exp == act,
            },
            (exp, act) => exp == act,
        }
    }

    fn generate_diff_output(&self, expected: &Value, actual: &Value) -> String {
        let expected_str = pretty(expected);
        let actual_str = pretty(actual);
        let text_diff = TextDiff::from_lines(&expected_str, &actual_str);

        let mut output = String::new();
        for (line_count, change) in text_diff.iter_all_changes().enumerate() {
            if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                output.push_str("... (diff truncated) ...\n");
                break;
            }

            let (sign, text) = match change.tag() {
                ChangeTag::Delete => ("-", change.to_string()),
                ChangeTag::Insert => ("+", change.to_string()),
                ChangeTag::Equal => (" ", change.to_string()),
            };
            let line = match (self.options.colored, change.tag()) {
                (true, ChangeTag::Delete) => format!("{}{}", sign.red(), text.red()),
                (true, ChangeTag::Insert) => format!("{}{}", sign.green(), text.green()),
                _ => format!("{sign}{text}"),
            };
            output.push_str(&line);
        }

        output
    }

    fn collect_diff_paths(&self, expected: &Value, actual: &Value, path: String, paths: &mut Vec<String>) {
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                let all_keys: BTreeSet<_> = exp.keys().chain(act.keys()).collect();

                for key in all_keys {
                    let new_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };

                    match (exp.get(key), act.get(key)) {
                        (Some(e), Some(a)) => {
                            if !self.values_match(e, a) {
                                self.collect_diff_paths(e, a, new_path, paths);
                            }
                        }
                        (Some(_), None) => paths.push(format!("{} (missing in actual)", new_path)),
                        (None, Some(_)) => paths.push(format!("{} (extra in actual)", new_path)),
                        (None, None) => {}
                    }
                }
            }
            (Value::Array(exp), Value::Array(act)) => {
                for (i, (e, a)) in exp.iter().zip(act).enumerate() {
                    if !self.values_match(e, a) {
                        self.collect_diff_paths(e, a, format!("{}[{}]", path, i), paths);
                    }
                }

                if exp.len() != act.len() {
                    paths.push(format!("{} (array length mismatch: {} vs {})", path, exp.len(), act.len()));
                }
            }
            _ => {
                if !self.values_match(expected, actual) {
                    paths.push(if path.is_empty() { "<root>".to_string() } else { path });
                }
            }
        }
    }
}

fn pretty(val: &Value) -> String {
    let mut text = serde_json::to_string_pretty(val).unwrap_or_else(|_| val.to_string());
    text.push('\n');
    text
}
