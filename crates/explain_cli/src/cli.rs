//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use explain_core::config::DEFAULT_REPORT_FILE;
use explain_core::RunConfig;
use explain_llms::SchemaStyle;

/// Explain every source file in a tree with a chat-completion model
#[derive(Parser, Debug)]
#[command(name = "explain-code", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON lines for machine consumption
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze every candidate file and write the report
    Run(RunArgs),
    /// List the files a run would analyze, without calling the endpoint
    Files(DiscoveryArgs),
    /// Normalize a saved chat-completion response
    Normalize {
        /// Path to the raw response JSON
        path: PathBuf,
    },
    /// Print the structured-output schema sent with every request
    Schema {
        /// Declaration style to print
        #[arg(long, value_enum, default_value = "functions")]
        schema_style: SchemaStyleArg,
    },
}

/// Where to look and where the report goes.
#[derive(Args, Debug, Clone)]
pub struct DiscoveryArgs {
    /// Directory to scan
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Report file, overwritten every run
    #[arg(long, default_value = DEFAULT_REPORT_FILE)]
    pub report: PathBuf,

    /// File extension to analyze; repeatable or comma-separated (default: py,sql)
    #[arg(long = "ext", value_name = "EXT", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Extra directory-name marker to skip, on top of .github, venv, .venv, __pycache__
    #[arg(long = "skip", value_name = "MARKER")]
    pub skip_markers: Vec<String>,

    /// File never to analyze; repeatable
    #[arg(long = "exclude", value_name = "PATH")]
    pub excluded: Vec<PathBuf>,
}

impl DiscoveryArgs {
    pub fn to_run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(&self.root)
            .with_report_path(&self.report)
            .with_skip_markers(self.skip_markers.iter().cloned());
        if !self.extensions.is_empty() {
            config = config.with_extensions(&self.extensions);
        }
        for path in &self.excluded {
            config = config.with_excluded(path);
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub discovery: DiscoveryArgs,

    /// Model to use. Uses DEEPSEEK_MODEL env if not set (default: deepseek-reasoner)
    #[arg(long)]
    pub model: Option<String>,

    /// Endpoint base URL or full /chat/completions URL. Uses DEEPSEEK_ENDPOINT env if not set
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Sampling temperature (default: 0.2)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Maximum tokens per response (default: 1200)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds (default: 60)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// How the schema is declared: legacy functions or forced tool call
    #[arg(long, value_enum)]
    pub schema_style: Option<SchemaStyleArg>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum SchemaStyleArg {
    /// Top-level `functions` array
    #[default]
    Functions,
    /// `tools` array with `tool_choice`
    Tools,
}

impl From<SchemaStyleArg> for SchemaStyle {
    fn from(arg: SchemaStyleArg) -> Self {
        match arg {
            SchemaStyleArg::Functions => SchemaStyle::Functions,
            SchemaStyleArg::Tools => SchemaStyle::Tools,
        }
    }
}
