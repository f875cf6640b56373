//! Fixture corpus discovery and loading
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::{GoldenError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expected value meaning JSON null
pub const NULLMARK: &str = "__NULL__";

/// Expected value meaning no value at all
pub const UNDEFMARK: &str = "__UNDEF__";

/// One input/expectation pair of a fixture set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureEntry {
    /// Input handed to the subject. `None` when the key is missing,
    /// `Some(Null)` when it is an explicit `null`.
    #[serde(
        rename = "in",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub input: Option<Value>,

    /// Positional arguments, used instead of `in` by some groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,

    /// Expected output; missing means null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<Value>,

    /// Expected failure: `true` for any error, `"/re/"` for a regex, or
    /// a case-insensitive substring of the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl FixtureEntry {
    /// Field of a map input
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.input.as_ref().and_then(|input| input.get(name))
    }

    /// Expected output with the null markers resolved
    pub fn expected(&self) -> Value {
        self.out.as_ref().map(unmark).unwrap_or(Value::Null)
    }

    /// Whether this entry expects a failure
    pub fn expects_error(&self) -> bool {
        matches!(&self.err, Some(err) if !err.is_null() && err != &Value::Bool(false))
    }

    /// Check a failure message against the expectation
    pub fn error_matches(&self, message: &str) -> bool {
        match &self.err {
            Some(Value::Bool(true)) => true,
            Some(Value::String(pattern)) => match pattern
                .strip_prefix('/')
                .and_then(|p| p.strip_suffix('/'))
                .filter(|p| !p.is_empty())
            {
                Some(re) => match Regex::new(re) {
                    Ok(re) => re.is_match(message),
                    Err(_) => message.contains(pattern.as_str()),
                },
                None => message.to_lowercase().contains(&pattern.to_lowercase()),
            },
            _ => false,
        }
    }
}

/// Replace marker strings with JSON null, recursively
fn unmark(val: &Value) -> Value {
    match val {
        Value::String(s) if s == NULLMARK || s == UNDEFMARK => Value::Null,
        Value::Array(list) => Value::Array(list.iter().map(unmark).collect()),
        Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), unmark(v))).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Deserialize)]
struct FixtureSet {
    set: Vec<FixtureEntry>,
}

/// A named set of entries from a corpus file
#[derive(Debug, Clone)]
pub struct Fixture {
    pub group: String,
    pub name: String,
    pub source: PathBuf,
    pub entries: Vec<FixtureEntry>,
}

impl Fixture {
    /// `group/name`
    pub fn id(&self) -> String {
        format!("{}/{}", self.group, self.name)
    }
}

/// Manages the fixture corpus
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    /// Create a new corpus manager
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    /// Discover every fixture under the corpus directory, ordered by file
    /// then by group and name
    pub fn discover(&self) -> Result<Vec<Fixture>> {
        let mut fixtures = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(fixtures);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                fixtures.extend(self.load_file(path)?);
            }
        }

        Ok(fixtures)
    }

    /// Load all fixtures of one corpus file. Entries of a group without a
    /// `set` are skipped.
    pub fn load_file(&self, path: &Path) -> Result<Vec<Fixture>> {
        let content = fs::read_to_string(path)?;
        let groups: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_str(&content)?;

        let mut fixtures = Vec::new();
        for (group, sets) in groups {
            for (name, set) in sets {
                if set.get("set").is_none() {
                    continue;
                }
                let set: FixtureSet = serde_json::from_value(set)?;
                fixtures.push(Fixture {
                    group: group.clone(),
                    name,
                    source: path.to_path_buf(),
                    entries: set.set,
                });
            }
        }
        Ok(fixtures)
    }

    /// Look up one fixture by group and name
    pub fn find(&self, group: &str, name: &str) -> Result<Fixture> {
        self.discover()?
            .into_iter()
            .find(|f| f.group == group && f.name == name)
            .ok_or_else(|| {
                GoldenError::CorpusError(format!(
                    "No fixture '{}/{}' under {}",
                    group,
                    name,
                    self.corpus_dir.display()
                ))
            })
    }

    /// Group names present in the corpus
    pub fn groups(&self) -> Result<Vec<String>> {
        let mut groups: Vec<String> = self.discover()?.into_iter().map(|f| f.group).collect();
        groups.sort();
        groups.dedup();
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_corpus(dir: &Path) {
        let corpus = json!({
            "math": {
                "add": {"set": [{"in": [1, 2], "out": 3}, {"in": null}]},
                "DEF": {"note": "not a set"}
            },
            "text": {
                "upper": {"set": [{"in": "a", "out": "A"}, {"in": 1, "err": "/not a str/"}]}
            }
        });
        fs::write(dir.join("basic.json"), corpus.to_string()).unwrap();
    }

    #[test]
    fn test_discover_fixtures() {
        let temp_dir = TempDir::new().unwrap();
        write_corpus(temp_dir.path());

        let manager = CorpusManager::new(temp_dir.path());
        let ids: Vec<String> = manager.discover().unwrap().iter().map(Fixture::id).collect();
        assert_eq!(ids, vec!["math/add", "text/upper"]);
        assert_eq!(manager.groups().unwrap(), vec!["math", "text"]);
    }

    #[test]
    fn test_missing_corpus_is_empty() {
        let manager = CorpusManager::new("/nonexistent/corpus");
        assert!(manager.discover().unwrap().is_empty());
    }

    #[test]
    fn test_find_fixture() {
        let temp_dir = TempDir::new().unwrap();
        write_corpus(temp_dir.path());
        let manager = CorpusManager::new(temp_dir.path());

        let add = manager.find("math", "add").unwrap();
        assert_eq!(add.entries.len(), 2);
        assert_eq!(add.entries[1].input, Some(Value::Null));
        assert_eq!(add.entries[1].expected(), Value::Null);

        assert!(matches!(
            manager.find("math", "sub"),
            Err(GoldenError::CorpusError(_))
        ));
    }

    #[test]
    fn test_missing_input_differs_from_null() {
        let entry: FixtureEntry = serde_json::from_value(json!({"out": 1})).unwrap();
        assert_eq!(entry.input, None);
        let entry: FixtureEntry = serde_json::from_value(json!({"in": null})).unwrap();
        assert_eq!(entry.input, Some(Value::Null));
    }

    #[test]
    fn test_expected_resolves_markers() {
        let entry: FixtureEntry =
            serde_json::from_value(json!({"out": {"a": "__NULL__", "b": ["__UNDEF__", 1]}})).unwrap();
        assert_eq!(entry.expected(), json!({"a": null, "b": [null, 1]}));
    }

    #[test]
    fn test_error_matching() {
        let entry: FixtureEntry = serde_json::from_value(json!({"err": "/^Invalid data: .*a$/"})).unwrap();
        assert!(entry.expects_error());
        assert!(entry.error_matches("Invalid data: at a"));
        assert!(!entry.error_matches("Invalid data: at b"));

        let entry: FixtureEntry = serde_json::from_value(json!({"err": "EXPECTED string"})).unwrap();
        assert!(entry.error_matches("Invalid data: Expected string at a"));

        let entry: FixtureEntry = serde_json::from_value(json!({"err": true})).unwrap();
        assert!(entry.error_matches("anything"));

        let entry: FixtureEntry = serde_json::from_value(json!({"out": 1})).unwrap();
        assert!(!entry.expects_error());
    }
}
