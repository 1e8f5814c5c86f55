use crate::cli::DiffArgs;
use crate::error::CliResult;
use crate::input::{read_document, read_existing};
use aspect_versioning::{DiffConfig, DiffEngine, DiffMode};
use std::path::Path;

/// Load the diff config: defaults when no path is given
pub fn load_config(path: Option<&Path>) -> CliResult<DiffConfig> {
    match path {
        Some(path) => Ok(DiffConfig::load(path)?),
        None => Ok(DiffConfig::default()),
    }
}

/// Run one diff and return the payload as printable JSON
pub fn run_diff(args: &DiffArgs, mode: DiffMode, config: DiffConfig) -> CliResult<String> {
    let config = match &args.version_info {
        Some(info) => config.with_version_info(info.clone()),
        None => config,
    };

    let input = read_document(&args.input)?;
    let existing = read_existing(args.existing.as_deref())?;

    let payload = DiffEngine::new(config).diff(&input, &existing, mode)?;
    tracing::info!(
        mode = mode.as_str(),
        updates = payload.update.len(),
        deletes = payload.delete.len(),
        "diff complete"
    );

    let json = payload.to_json();
    let text = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}
