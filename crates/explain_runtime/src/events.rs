//! Progress events and the end-of-run summary.

use std::path::PathBuf;
use std::time::Duration;

use explain_llms::Layer;

/// Emitted while a run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// A file is about to be read and sent.
    FileStarted {
        index: usize,
        total: usize,
        path: PathBuf,
        display_name: String,
    },
    /// A response came back (or the request failed) and was normalized.
    FileAnalyzed {
        display_name: String,
        layer: Layer,
        elapsed: Duration,
    },
    /// The file could not be read; it gets an error section in the report.
    ReadFailed { display_name: String, error: String },
    /// The report was written.
    ReportWritten { path: PathBuf, sections: usize },
}

/// How one file ended up in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Analyzed(Layer),
    ReadFailed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Analyzed(layer) => layer.as_str(),
            FileStatus::ReadFailed => "read_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub display_name: String,
    pub status: FileStatus,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub report_path: PathBuf,
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Files whose response honored the structured contract.
    pub fn structured(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Analyzed(layer) if layer.is_structured()))
    }

    /// Files recovered heuristically or carrying a diagnostic.
    pub fn degraded(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Analyzed(layer) if !layer.is_structured()))
    }

    pub fn read_failures(&self) -> usize {
        self.count(|s| *s == FileStatus::ReadFailed)
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}
