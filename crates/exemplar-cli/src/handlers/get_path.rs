//! Get-path command handler

use super::utils::load_document;
use crate::cli::GetPathArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use exemplar_core::get_path;

/// Handle the get-path command. A missing path prints `null`.
pub fn handle_get_path(args: GetPathArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    let store = load_document(&args.store)?;

    let found = get_path(args.path.as_str(), &store);
    if found.is_none() {
        output.warning(&format!("No value at {}", args.path))?;
    }
    output.data(&found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::handlers::test_util::write_doc;
    use crate::output::tests::Capture;
    use tempfile::TempDir;

    fn lookup(path: &str, format: OutputFormat) -> String {
        let temp_dir = TempDir::new().unwrap();
        let args = GetPathArgs {
            path: path.to_string(),
            store: write_doc(temp_dir.path(), "store.json", r#"{"a": {"b": [10, {"c": "deep"}]}}"#),
        };

        let capture = Capture::default();
        handle_get_path(args, &Config::default(), &mut capture.writer(format)).unwrap();
        capture.text()
    }

    #[test]
    fn test_get_path_found() {
        assert_eq!(lookup("a.b.1.c", OutputFormat::Json), "\"deep\"\n");
        assert_eq!(lookup("a.b.0", OutputFormat::Json), "10\n");
        assert_eq!(lookup("", OutputFormat::Json), "{\"a\":{\"b\":[10,{\"c\":\"deep\"}]}}\n");
    }

    #[test]
    fn test_get_path_missing() {
        assert_eq!(lookup("a.x", OutputFormat::Json), "null\n");
        assert_eq!(lookup("a.x", OutputFormat::Human), "WARNING: No value at a.x\nnull\n");
    }
}
