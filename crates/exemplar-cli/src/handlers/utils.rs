//! Shared utilities for command handlers

use crate::error::{Error, Result};
use anyhow::Context;
use exemplar_core::Value;
use std::fs;
use std::path::Path;

/// Load a JSON or YAML document, chosen by file extension
pub fn load_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);

    let json: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            reason: e.to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
            reason: e.to_string(),
        })?
    };

    tracing::debug!(path = %path.display(), "loaded document");
    Ok(Value::from(json))
}

/// Load a document when a path is given
pub fn load_optional(path: Option<&Path>) -> Result<Option<Value>> {
    path.map(load_document).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_util::write_doc;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_and_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let json_path = write_doc(temp_dir.path(), "a.json", r#"{"a": [1, {"b": null}]}"#);
        let yaml_path = write_doc(temp_dir.path(), "a.yml", "a:\n  - 1\n  - b: ~\n");

        assert_eq!(load_document(&json_path).unwrap().to_json(), json!({"a": [1, {"b": null}]}));
        assert_eq!(load_document(&yaml_path).unwrap().to_json(), json!({"a": [1, {"b": null}]}));
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("none.json");
        assert!(matches!(load_document(&missing), Err(Error::FileNotFound { .. })));

        let broken = write_doc(temp_dir.path(), "broken.json", "{");
        match load_document(&broken) {
            Err(Error::InvalidFormat { expected, .. }) => assert_eq!(expected, "JSON"),
            other => panic!("expected a format error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_optional() {
        assert!(load_optional(None).unwrap().is_none());
    }
}
