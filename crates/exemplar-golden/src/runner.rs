//! Runs fixture sets against a subject closure
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::{
    corpus::{CorpusManager, Fixture, FixtureEntry},
    diff::DiffEngine,
    GoldenConfig, GoldenError, Result,
};
use colored::*;
use serde_json::Value;
use std::time::Instant;

/// A failed entry of a fixture set
#[derive(Debug)]
pub struct EntryFailure {
    /// Position in the set
    pub index: usize,

    /// Input of the entry, for context
    pub input: Option<Value>,

    pub reason: String,

    /// Diff of expected against actual output
    pub diff: Option<String>,
}

/// Result of running one fixture set
#[derive(Debug)]
pub struct FixtureResult {
    pub name: String,
    pub total: usize,
    pub failures: Vec<EntryFailure>,
    pub duration_ms: u64,
}

impl FixtureResult {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Print the result
    pub fn print(&self, verbose: bool) {
        let status = if self.passed() {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!(
            "{} {} ({}/{} entries, {}ms)",
            status,
            self.name,
            self.total - self.failures.len(),
            self.total,
            self.duration_ms
        );

        for failure in &self.failures {
            println!("  {} #{}: {}", "Error".red(), failure.index, failure.reason);
            if verbose {
                if let Some(input) = &failure.input {
                    println!("  in: {}", input);
                }
            }
            if let Some(diff) = &failure.diff {
                println!("{}", diff);
            }
        }
    }

    fn summary(&self) -> String {
        let mut out = format!(
            "{}: {} of {} entries failed",
            self.name,
            self.failures.len(),
            self.total
        );
        for failure in &self.failures {
            out.push_str(&format!("\n  #{}: {}", failure.index, failure.reason));
            if let Some(diff) = &failure.diff {
                out.push('\n');
                out.push_str(diff);
            }
        }
        out
    }
}

/// Runner for fixture sets
pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
    diff_engine: DiffEngine,
}

impl GoldenTestRunner {
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);
        let diff_engine = DiffEngine::new(config.diff_options.clone());

        Self {
            config,
            corpus_manager,
            diff_engine,
        }
    }

    /// Run the fixture `group/name` against `subject`, failing with a
    /// summary of every failed entry
    pub fn run_test<F>(&self, group: &str, name: &str, subject: F) -> Result<FixtureResult>
    where
        F: FnMut(&FixtureEntry) -> std::result::Result<Value, String>,
    {
        let fixture = self.corpus_manager.find(group, name)?;
        let result = self.run_fixture(&fixture, subject);

        if self.config.verbose || !result.passed() {
            result.print(self.config.verbose);
        }

        if result.passed() {
            Ok(result)
        } else {
            Err(GoldenError::TestFailed(result.summary()))
        }
    }

    /// Run every entry of `fixture`, collecting failures
    pub fn run_fixture<F>(&self, fixture: &Fixture, mut subject: F) -> FixtureResult
    where
        F: FnMut(&FixtureEntry) -> std::result::Result<Value, String>,
    {
        let start = Instant::now();

        let failures = fixture
            .entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                self.check_entry(entry, subject(entry)).map(|(reason, diff)| EntryFailure {
                    index,
                    input: entry.input.clone(),
                    reason,
                    diff,
                })
            })
            .collect();

        FixtureResult {
            name: fixture.id(),
            total: fixture.entries.len(),
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// `None` when the outcome meets the expectation
    fn check_entry(
        &self,
        entry: &FixtureEntry,
        outcome: std::result::Result<Value, String>,
    ) -> Option<(String, Option<String>)> {
        match outcome {
            Ok(actual) if entry.expects_error() => Some((
                format!(
                    "expected error [{}], got output {}",
                    entry.err.as_ref().map(Value::to_string).unwrap_or_default(),
                    actual
                ),
                None,
            )),
            Ok(actual) => {
                let result = self.diff_engine.compare(&entry.expected(), &actual);
                (!result.matches).then(|| {
                    (
                        format!("output mismatch at {}", result.differing_paths.join(", ")),
                        Some(result.diff_output),
                    )
                })
            }
            Err(message) if entry.expects_error() => (!entry.error_matches(&message)).then(|| {
                (
                    format!(
                        "ERROR MATCH: [{}] <=> [{}]",
                        entry.err.as_ref().map(Value::to_string).unwrap_or_default(),
                        message
                    ),
                    None,
                )
            }),
            Err(message) => Some((format!("unexpected error: {}", message), None)),
        }
    }

    /// List all available fixtures as `group/name`
    pub fn list_tests(&self) -> Result<Vec<String>> {
        Ok(self.corpus_manager.discover()?.iter().map(Fixture::id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiffOptions;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn runner_for(corpus: Value) -> (TempDir, GoldenTestRunner) {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("corpus.json"), corpus.to_string()).unwrap();
        let config = GoldenConfig {
            corpus_dir: temp_dir.path().to_path_buf(),
            diff_options: DiffOptions {
                colored: false,
                ..Default::default()
            },
            verbose: false,
        };
        (temp_dir, GoldenTestRunner::new(config))
    }

    fn upper(entry: &FixtureEntry) -> std::result::Result<Value, String> {
        match &entry.input {
            Some(Value::String(s)) => Ok(Value::String(s.to_uppercase())),
            other => Err(format!("not a string: {:?}", other)),
        }
    }

    #[test]
    fn test_passing_set() {
        let (_dir, runner) = runner_for(json!({
            "text": {"upper": {"set": [
                {"in": "a", "out": "A"},
                {"in": 1, "err": "not a string"},
                {"err": "/^not a string: None$/"}
            ]}}
        }));

        let result = runner.run_test("text", "upper", upper).unwrap();
        assert!(result.passed());
        assert_eq!(result.total, 3);
        assert_eq!(runner.list_tests().unwrap(), vec!["text/upper"]);
    }

    #[test]
    fn test_failures_are_collected() {
        let (_dir, runner) = runner_for(json!({
            "text": {"upper": {"set": [
                {"in": "a", "out": "a"},
                {"in": "b", "err": true},
                {"in": 1, "out": 1},
                {"in": 2, "err": "/^other/"}
            ]}}
        }));

        let fixture = CorpusManager::new(&runner.config.corpus_dir)
            .find("text", "upper")
            .unwrap();
        let result = runner.run_fixture(&fixture, upper);

        let indexes: Vec<usize> = result.failures.iter().map(|f| f.index).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3]);
        assert_eq!(result.failures[0].reason, "output mismatch at <root>");
        assert!(result.failures[0].diff.is_some());
        assert!(result.failures[2].reason.starts_with("unexpected error: "));
        assert!(result.failures[3].reason.starts_with("ERROR MATCH: "));
    }

    #[test]
    fn test_run_test_reports_summary() {
        let (_dir, runner) = runner_for(json!({
            "text": {"upper": {"set": [{"in": "a", "out": "B"}]}}
        }));

        match runner.run_test("text", "upper", upper) {
            Err(GoldenError::TestFailed(summary)) => {
                assert!(summary.starts_with("text/upper: 1 of 1 entries failed"));
            }
            other => panic!("expected a failure, got {:?}", other),
        }
    }
}
