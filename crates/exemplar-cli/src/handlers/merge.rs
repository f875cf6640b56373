//! Merge command handler

use super::utils::load_document;
use crate::cli::MergeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use exemplar_core::merge_list;

/// Handle the merge command
pub fn handle_merge(args: MergeArgs, _config: &Config, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Merging {} document(s)", args.files.len()))?;

    let documents = args
        .files
        .iter()
        .map(|path| load_document(path))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_list(&documents);
    output.data(&merged)
}
