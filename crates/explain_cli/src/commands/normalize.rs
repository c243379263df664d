//! `explain-code normalize`: run the normalizer on a saved response.

use std::path::Path;

use anyhow::{Context, Result};
use explain_core::ReportEntry;
use explain_llms::normalize_traced;
use serde_json::Value;

use crate::output;

pub fn handle(path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let response: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not JSON", path.display()))?;

    let normalized = normalize_traced(&response);

    if output::is_json() {
        output::json_pretty(&serde_json::json!({
            "layer": normalized.layer.as_str(),
            "result": normalized.result,
        }));
    } else {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        print!("{}", ReportEntry::analysis(name, normalized.result).render());
        output::dim(&format!("layer: {}", normalized.layer));
    }
    Ok(())
}
