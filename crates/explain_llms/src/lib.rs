//! explain_llms: talks to a chat-completion endpoint and turns whatever comes
//! back into an [`AnalysisResult`](explain_core::AnalysisResult).
//!
//! ## Flow
//!
//! ```text
//!  build_analysis_request ──▶ Transport::send ──▶ normalize_outcome
//!        (request)              (transport)          (normalize)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use explain_llms::{build_analysis_request, normalize_outcome, ChatCompletionsClient, Transport};
//!
//! # async fn run() -> explain_llms::Result<()> {
//! let client = ChatCompletionsClient::from_env()?;
//! let request = build_analysis_request(&client.config().params, "main.py", "print('hi')");
//! let result = normalize_outcome(client.send(&request).await);
//! println!("{}", result.explanation);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod normalize;
pub mod request;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use normalize::{
    normalize, normalize_outcome, normalize_outcome_traced, normalize_traced, Layer, Normalized,
};
pub use request::{analysis_function, build_analysis_request, ANALYSIS_FUNCTION_NAME, SYSTEM_PROMPT};
pub use transport::{ChatCompletionsClient, Transport};
pub use types::{
    ChatConfig, ChatMessage, ChatRequest, FunctionDefinition, RequestParams, Role, SchemaStyle,
    ToolDefinition,
};
