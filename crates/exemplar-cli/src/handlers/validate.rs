//! Validate command handler

use super::utils::{load_document, load_optional};
use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use exemplar_core::validate_collect;
use serde_json::json;

/// Handle the validate command.
///
/// Errors are always listed. They fail the command unless collecting,
/// from `--collect` or the `validate.collect` setting.
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!(
        "Validating {} against {}",
        args.data.display(),
        args.spec.display()
    ))?;

    let data = load_document(&args.data)?;
    let spec = load_document(&args.spec)?;
    let extra = load_optional(args.extra.as_deref())?;
    let collect = args.collect || config.validate.collect;

    let mut errors = Vec::new();
    let result = validate_collect(&data, &spec, extra.as_ref(), &mut errors);
    tracing::debug!(errors = errors.len(), collect, "validation finished");

    if errors.is_empty() {
        output.success("✓ Data is valid")?;
        return output.data(&result);
    }

    if !collect {
        output.error(&format!("✗ Validation failed with {} error(s)", errors.len()))?;
        output.errors(&errors)?;
        return Err(Error::Core(exemplar_core::Error::validation(errors)));
    }

    output.warning(&format!("Validation found {} error(s)", errors.len()))?;
    output.errors(&errors)?;
    match output.format() {
        OutputFormat::Human => output.data(&result),
        _ => output.data(&json!({
            "out": result.as_ref().map(|r| r.to_json()),
            "errors": errors,
        })),
    }
}
