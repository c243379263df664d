//! Run configuration: what to scan and where the report goes.

use std::path::PathBuf;

use crate::error::{ExplainError, Result};

/// Source extensions analyzed when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["py", "sql"];

/// Directory name fragments that prune a subtree from traversal.
pub const DEFAULT_SKIP_MARKERS: &[&str] = &[".github", "venv", ".venv", "__pycache__"];

/// Report file written when no path is given.
pub const DEFAULT_REPORT_FILE: &str = "ai_explanations.txt";

/// Configuration for one explain run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory to traverse
    pub root: PathBuf,
    /// Report output path (overwritten every run)
    pub report_path: PathBuf,
    /// Candidate file extensions, without the leading dot
    pub extensions: Vec<String>,
    /// A directory whose name contains any of these is skipped with its subtree
    pub skip_markers: Vec<String>,
    /// Files never analyzed, even when they match
    pub excluded: Vec<PathBuf>,
}

impl RunConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_markers: DEFAULT_SKIP_MARKERS.iter().map(|m| m.to_string()).collect(),
            excluded: Vec::new(),
        }
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Replace the extension list. Accepts `py`, `.py` or `.PY` alike.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Add skip markers on top of the defaults.
    pub fn with_skip_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_markers.extend(markers.into_iter().map(Into::into));
        self
    }

    pub fn with_excluded(mut self, path: impl Into<PathBuf>) -> Self {
        self.excluded.push(path.into());
        self
    }

    /// Add the report path to the exclusions so a run never analyzes its own output.
    pub fn excluding_report(self) -> Self {
        let report = self.report_path.clone();
        self.with_excluded(report)
    }

    /// Check the configuration before any work starts.
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(ExplainError::Config(format!(
                "root is not a directory: {}",
                self.root.display()
            )));
        }
        if self.extensions.is_empty() {
            return Err(ExplainError::Config(
                "at least one file extension is required".into(),
            ));
        }
        Ok(())
    }

    /// Report text used when no candidate file was found,
    /// e.g. `No .py or .sql files found to analyze.`
    pub fn empty_report_placeholder(&self) -> String {
        let dotted: Vec<String> = self.extensions.iter().map(|e| format!(".{e}")).collect();
        let list = match dotted.split_last() {
            None => "source".to_string(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
        };
        format!("No {list} files found to analyze.\n")
    }
}
