use crate::error::{CliError, CliResult};
use serde_json::Value as JsonValue;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Read and parse one JSON-LD document; `-` reads stdin
pub fn read_document(path: &Path) -> CliResult<JsonValue> {
    let text = if path.as_os_str() == "-" {
        if io::stdin().is_terminal() {
            return Err(CliError::Usage(format!(
                "`-` reads the document from stdin, but stdin is a terminal\n  {} pipe the document in or pass a file path",
                colored::Colorize::bold(colored::Colorize::cyan("help:"))
            )));
        }
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display())))?
    };

    if text.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }
    serde_json::from_str(&text).map_err(|e| {
        CliError::Input(format!("{} is not valid JSON: {e}", path.display()))
    })
}

/// The stored snapshot, or an empty store when no file is given
pub fn read_existing(path: Option<&Path>) -> CliResult<JsonValue> {
    match path {
        Some(path) => read_document(path),
        None => Ok(JsonValue::Object(Default::default())),
    }
}
