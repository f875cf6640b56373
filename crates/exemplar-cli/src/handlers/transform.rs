//! Transform and inject command handlers

use super::utils::{load_document, load_optional};
use crate::cli::{InjectArgs, TransformArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use exemplar_core::{inject, transform_with};

/// Handle the transform command
pub fn handle_transform(args: TransformArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!(
        "Transforming {} with {}",
        args.data.display(),
        args.spec.display()
    ))?;

    let data = load_document(&args.data)?;
    let spec = load_document(&args.spec)?;
    let extra = load_optional(args.extra.as_deref())?;

    let result = transform_with(&data, &spec, extra.as_ref(), None);
    tracing::debug!(result = %output.summary(result.as_ref()), "transform finished");

    output.success("✓ Transform completed")?;
    output.data(&result)
}

/// Handle the inject command
pub fn handle_inject(args: InjectArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!(
        "Injecting {} into {}",
        args.store.display(),
        args.spec.display()
    ))?;

    let spec = load_document(&args.spec)?;
    let store = load_document(&args.store)?;

    let result = inject(&spec, &store);
    output.data(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::error::Error;
    use crate::handlers::test_util::write_doc;
    use crate::output::tests::Capture;
    use tempfile::TempDir;

    #[test]
    fn test_transform_files() {
        let temp_dir = TempDir::new().unwrap();
        let args = TransformArgs {
            data: write_doc(temp_dir.path(), "data.json", r#"{"user": {"name": "Ada"}, "tags": ["x", "y"]}"#),
            spec: write_doc(
                temp_dir.path(),
                "spec.yaml",
                "greeting: Hello `user.name`\nfirst: '`tags.0`'\nsite: '`site`'\n",
            ),
            extra: Some(write_doc(temp_dir.path(), "extra.json", r#"{"site": "docs"}"#)),
        };

        let capture = Capture::default();
        handle_transform(args, &Config::default(), &mut capture.writer(OutputFormat::Json)).unwrap();
        assert_eq!(
            capture.text(),
            "{\"greeting\":\"Hello Ada\",\"first\":\"x\",\"site\":\"docs\"}\n"
        );
    }

    #[test]
    fn test_transform_human_output() {
        let temp_dir = TempDir::new().unwrap();
        let args = TransformArgs {
            data: write_doc(temp_dir.path(), "data.json", r#"{"a": 1}"#),
            spec: write_doc(temp_dir.path(), "spec.json", r#"{"b": "`a`"}"#),
            extra: None,
        };

        let capture = Capture::default();
        handle_transform(args, &Config::default(), &mut capture.writer(OutputFormat::Human)).unwrap();
        let text = capture.text();
        assert!(text.starts_with("INFO: Transforming "));
        assert!(text.contains("✓ Transform completed\n"));
        assert!(text.ends_with("{\n  \"b\": 1\n}\n"));
    }

    #[test]
    fn test_transform_missing_spec() {
        let temp_dir = TempDir::new().unwrap();
        let args = TransformArgs {
            data: write_doc(temp_dir.path(), "data.json", "{}"),
            spec: temp_dir.path().join("nope.json"),
            extra: None,
        };

        let capture = Capture::default();
        let err = handle_transform(args, &Config::default(), &mut capture.writer(OutputFormat::Json)).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_inject_files() {
        let temp_dir = TempDir::new().unwrap();
        let args = InjectArgs {
            spec: write_doc(temp_dir.path(), "spec.json", r#"{"url": "http://`host`:`port`/", "port": "`port`"}"#),
            store: write_doc(temp_dir.path(), "store.yaml", "host: db\nport: 5432\n"),
        };

        let capture = Capture::default();
        handle_inject(args, &Config::default(), &mut capture.writer(OutputFormat::Json)).unwrap();
        assert_eq!(capture.text(), "{\"url\":\"http://db:5432/\",\"port\":5432}\n");
    }
}
