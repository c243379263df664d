//! `explain-code files`: dry run of discovery.

use anyhow::{Context, Result};
use explain_core::discover;

use crate::cli::DiscoveryArgs;
use crate::output;

pub fn handle(args: DiscoveryArgs) -> Result<()> {
    let config = args.to_run_config().excluding_report();
    let files = discover(&config).context("discovery failed")?;

    if files.is_empty() {
        output::dim(config.empty_report_placeholder().trim_end());
        return Ok(());
    }

    output::header(&format!("{} file(s) under {}", files.len(), config.root.display()));

    let mut table = output::table();
    output::table_header(&mut table, &["File", "Bytes"]);
    let mut items = Vec::with_capacity(files.len());
    for file in &files {
        let size = std::fs::metadata(&file.path).map(|m| m.len()).ok();
        let size_text = size.map_or_else(|| "?".to_string(), |s| s.to_string());
        output::table_row(&mut table, &file.display_name, &[size_text.as_str()]);
        items.push(serde_json::json!({
            "file": file.display_name,
            "path": file.path,
            "bytes": size,
        }));
    }
    output::table_print(&table, "files", items);
    Ok(())
}
