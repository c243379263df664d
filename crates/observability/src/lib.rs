//! explain-observability - tracing setup for the explain-code tools
//!
//! One call to [`init`] installs a `tracing` subscriber with an env filter,
//! a human-readable layer on stderr (stdout stays free for progress lines
//! and JSON output) and, when an endpoint is configured, OTLP span export.
//!
//! # Quick Start
//!
//! ```no_run
//! use explain_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::from_env().with_fallback_level("warn");
//! init(config)?;
//!
//! tracing::info!("started");
//! # Ok::<(), explain_observability::ObservabilityError>(())
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` - Service name (default `explain-code`)
//! - `OTEL_SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint; export is off when unset
//! - `OTEL_LOG_LEVEL` or `RUST_LOG` - Log level filter

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::ObservabilityConfig;
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use self::tracing::{record_duration, record_error};

// Span macros are exported at the crate root via #[macro_export]:
// explain_observability::analysis_span!(), explain_observability::request_span!()
