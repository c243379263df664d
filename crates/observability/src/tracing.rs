//! Span helpers for the analysis pipeline

/// Create a span for one file's analysis
///
/// `layer`, `duration_ms` and the error fields start empty and are filled
/// in with [`record_duration`](crate::record_duration) and
/// [`record_error`](crate::record_error).
///
/// # Example
///
/// ```rust
/// use explain_observability::analysis_span;
///
/// let span = analysis_span!("pkg/main.py");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! analysis_span {
    ($file:expr) => {
        tracing::info_span!(
            "analysis.file",
            file = $file,
            layer = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Create a span for one chat-completion request
///
/// # Example
///
/// ```rust
/// use explain_observability::request_span;
///
/// let span = request_span!("deepseek-reasoner", "https://api.deepseek.com/chat/completions");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! request_span {
    ($model:expr, $endpoint:expr) => {
        tracing::debug_span!(
            "chat.request",
            model = $model,
            endpoint = $endpoint,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record a recovered failure on the current span and log it at `warn`
///
/// # Example
///
/// ```rust
/// use explain_observability::record_error;
///
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
/// record_error(&err);
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::warn!(error = %error, "operation failed");
}

/// Record a duration in milliseconds on the current span
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
