//! explain-runtime: drives one explain run.
//!
//! Discovery → for each file: read → request → send → normalize → report.
//! Files are processed one at a time, in traversal order.

pub mod analyzer;
pub mod error;
pub mod events;

pub use analyzer::Analyzer;
pub use error::{Result, RuntimeError};
pub use events::{FileOutcome, FileStatus, RunEvent, RunSummary};
