//! explain-core: analysis results, report assembly and source discovery.
//!
//! Everything here is synchronous and free of network concerns. The LLM side
//! lives in `explain-llms`; `explain-runtime` glues the two together.

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod report;

pub use analysis::AnalysisResult;
pub use config::RunConfig;
pub use discovery::{discover, SourceFile};
pub use error::{ExplainError, Result};
pub use report::{assemble, write_report, Report, ReportEntry};
