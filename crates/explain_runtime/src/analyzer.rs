//! The per-file pipeline and the run driver.

use std::sync::Arc;
use std::time::Instant;

use explain_core::{discover, write_report, Report, ReportEntry, RunConfig, SourceFile};
use explain_llms::{
    build_analysis_request, normalize_outcome_traced, ChatCompletionsClient, ChatConfig,
    Normalized, RequestParams, Transport,
};
use explain_observability::{analysis_span, record_duration, record_error, request_span};
use tokio::sync::mpsc;
use tracing::{info, warn, Instrument};

use crate::error::{Result, RuntimeError};
use crate::events::{FileOutcome, FileStatus, RunEvent, RunSummary};

/// Runs files through request → transport → normalize.
///
/// Holds no per-file state; every file is analyzed independently.
pub struct Analyzer {
    transport: Arc<dyn Transport>,
    params: RequestParams,
    events: Option<mpsc::Sender<RunEvent>>,
}

impl Analyzer {
    pub fn new(transport: Arc<dyn Transport>, params: RequestParams) -> Self {
        Self {
            transport,
            params,
            events: None,
        }
    }

    /// Build an analyzer backed by [`ChatCompletionsClient`].
    ///
    /// Fails before any network call when the key is missing or the model
    /// parameters are unusable.
    pub fn from_chat_config(config: ChatConfig) -> Result<Self> {
        validate_params(&config.params)?;
        let params = config.params.clone();
        let client = ChatCompletionsClient::new(config)?;
        Ok(Self::new(Arc::new(client), params))
    }

    /// Send progress events to `tx`. A closed receiver is ignored.
    pub fn with_events(mut self, tx: mpsc::Sender<RunEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    /// Analyze one file's contents. Never fails: transport errors become a
    /// diagnostic result.
    pub async fn analyze_source(&self, display_name: &str, code: &str) -> Normalized {
        let request = build_analysis_request(&self.params, display_name, code);
        let endpoint = self.transport.endpoint();
        let span = request_span!(request.model.as_str(), endpoint.as_str());

        let started = Instant::now();
        let outcome = self.transport.send(&request).instrument(span.clone()).await;
        span.in_scope(|| {
            record_duration("duration_ms", started.elapsed());
            if let Err(err) = &outcome {
                record_error(err);
            }
        });

        let normalized = normalize_outcome_traced(outcome);
        tracing::Span::current().record("layer", normalized.layer.as_str());
        normalized
    }

    /// Read and analyze one file. A read failure becomes an error section.
    pub async fn analyze_file(&self, file: &SourceFile) -> (ReportEntry, FileStatus) {
        let span = analysis_span!(file.display_name.as_str());
        async {
            let started = Instant::now();
            let bytes = match tokio::fs::read(&file.path).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "failed to read file");
                    record_error(&err);
                    self.emit(RunEvent::ReadFailed {
                        display_name: file.display_name.clone(),
                        error: err.to_string(),
                    })
                    .await;
                    return (
                        ReportEntry::read_failure(file.display_name.clone(), err),
                        FileStatus::ReadFailed,
                    );
                }
            };

            let code = String::from_utf8_lossy(&bytes);
            let Normalized { result, layer } =
                self.analyze_source(&file.display_name, &code).await;
            record_duration("duration_ms", started.elapsed());
            info!(layer = %layer, "file analyzed");

            self.emit(RunEvent::FileAnalyzed {
                display_name: file.display_name.clone(),
                layer,
                elapsed: started.elapsed(),
            })
            .await;
            (
                ReportEntry::analysis(file.display_name.clone(), result),
                FileStatus::Analyzed(layer),
            )
        }
        .instrument(span)
        .await
    }

    /// Analyze `files` sequentially, keeping their order in the report.
    pub async fn run(&self, files: &[SourceFile]) -> (Report, Vec<FileOutcome>) {
        let mut report = Report::new();
        let mut outcomes = Vec::with_capacity(files.len());
        let total = files.len();

        for (index, file) in files.iter().enumerate() {
            self.emit(RunEvent::FileStarted {
                index,
                total,
                path: file.path.clone(),
                display_name: file.display_name.clone(),
            })
            .await;

            let (entry, status) = self.analyze_file(file).await;
            report.push(entry);
            outcomes.push(FileOutcome {
                display_name: file.display_name.clone(),
                status,
            });
        }

        (report, outcomes)
    }

    /// Full run: discover, analyze, write the report.
    ///
    /// The report file itself is never analyzed. Only configuration problems
    /// and a failed report write return an error.
    pub async fn explain(&self, config: &RunConfig) -> Result<RunSummary> {
        let config = config.clone().excluding_report();
        let files = discover(&config)?;
        info!(root = %config.root.display(), files = files.len(), "starting run");

        let (report, files) = self.run(&files).await;
        let report = report.with_placeholder(config.empty_report_placeholder());
        write_report(&report, &config.report_path)?;

        self.emit(RunEvent::ReportWritten {
            path: config.report_path.clone(),
            sections: report.len(),
        })
        .await;

        Ok(RunSummary {
            report_path: config.report_path,
            files,
        })
    }

    async fn emit(&self, event: RunEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event).await;
        }
    }
}

fn validate_params(params: &RequestParams) -> Result<()> {
    if params.model.trim().is_empty() {
        return Err(RuntimeError::ConfigError("model must not be empty".into()));
    }
    if params.max_tokens == 0 {
        return Err(RuntimeError::ConfigError("max_tokens must be positive".into()));
    }
    if !(0.0..=2.0).contains(&params.temperature) {
        return Err(RuntimeError::ConfigError(format!(
            "temperature must be between 0 and 2, got {}",
            params.temperature
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_params() {
        assert!(validate_params(&RequestParams::default()).is_ok());

        let params = RequestParams {
            max_tokens: 0,
            ..RequestParams::default()
        };
        assert!(validate_params(&params).is_err());

        let params = RequestParams {
            temperature: 3.5,
            ..RequestParams::default()
        };
        assert!(validate_params(&params).is_err());

        let params = RequestParams {
            model: " ".into(),
            ..RequestParams::default()
        };
        assert!(validate_params(&params).is_err());
    }

    #[test]
    fn test_from_chat_config_requires_key() {
        let err = Analyzer::from_chat_config(ChatConfig::new("")).err().unwrap();
        assert!(err.is_configuration());
        assert!(matches!(err, RuntimeError::Llm(_)));
    }

    #[test]
    fn test_from_chat_config_rejects_bad_params() {
        let config = ChatConfig::new("sk-test").with_max_tokens(0);
        let err = Analyzer::from_chat_config(config).err().unwrap();
        assert!(matches!(err, RuntimeError::ConfigError(_)));
    }
}
