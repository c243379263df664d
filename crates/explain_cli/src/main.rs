//! CLI entry point for explain-code.

mod cli;
mod commands;
mod output;

use std::path::Path;

use clap::Parser;
use explain_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Load env files. `dotenvy` never overrides a variable that is already set,
/// so the first file to define a key wins.
/// Order: 1) process environment  2) nearest `.env` (cwd or a parent)  3) ~/.explain-code/env
fn load_env_files() {
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(env_file) = find_upwards(&cwd, ".env") {
            let _ = dotenvy::from_path(&env_file);
        }
    }
    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".explain-code").join("env");
        if config_path.exists() {
            let _ = dotenvy::from_path(&config_path);
        }
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<std::path::PathBuf> {
    start
        .ancestors()
        .take(32)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn init_tracing(verbose: bool) {
    let config = ObservabilityConfig::from_env().with_version(env!("CARGO_PKG_VERSION"));
    let config = if verbose {
        config.with_log_level("debug")
    } else {
        config.with_fallback_level("warn")
    };
    if let Err(e) = explain_observability::init(config) {
        output::warning(&e.to_string());
    }
}

#[tokio::main]
async fn main() {
    load_env_files();
    let cli = Cli::parse();
    output::init(cli.output);
    init_tracing(cli.verbose);

    let result = commands::handle(cli).await;
    explain_observability::shutdown();

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
