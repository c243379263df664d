//! `explain-code run`: the full pipeline.

use anyhow::{Context, Result};
use explain_llms::ChatConfig;
use explain_runtime::{Analyzer, FileStatus, RunEvent, RunSummary};
use indicatif::ProgressBar;
use tokio::sync::mpsc;

use crate::cli::RunArgs;
use crate::output;

pub async fn handle(args: RunArgs) -> Result<()> {
    let chat_config = chat_config(&args)?;
    let run_config = args.discovery.to_run_config();

    let (tx, rx) = mpsc::channel(64);
    let analyzer = Analyzer::from_chat_config(chat_config)
        .context("cannot start analysis")?
        .with_events(tx);
    let printer = tokio::spawn(print_events(rx));

    let result = analyzer.explain(&run_config).await;
    // closes the event channel so the printer finishes
    drop(analyzer);
    printer.await.context("progress printer panicked")?;

    let summary = result.context("run failed")?;
    print_summary(&summary);
    output::plain(&format!(
        "Wrote explanations to {}",
        summary.report_path.display()
    ));
    Ok(())
}

/// Environment first, then flags on top.
fn chat_config(args: &RunArgs) -> Result<ChatConfig> {
    let mut config = ChatConfig::from_env()?;
    if let Some(endpoint) = &args.endpoint {
        config = config.with_base_url(endpoint);
    }
    if let Some(model) = &args.model {
        config = config.with_model(model);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(max_tokens) = args.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout_secs(timeout);
    }
    if let Some(style) = args.schema_style {
        config = config.with_schema_style(style.into());
    }
    Ok(config)
}

async fn print_events(mut rx: mpsc::Receiver<RunEvent>) {
    let mut spinner: Option<ProgressBar> = None;

    while let Some(event) = rx.recv().await {
        match event {
            RunEvent::FileStarted {
                index,
                total,
                path,
                display_name,
            } => {
                output::plain(&format!("Analyzing {}...", path.display()));
                spinner = Some(output::spinner(&format!(
                    "[{}/{}] waiting for {display_name}",
                    index + 1,
                    total
                )));
            }
            RunEvent::FileAnalyzed {
                display_name,
                layer,
                ..
            } => {
                if let Some(s) = spinner.take() {
                    s.finish_and_clear();
                }
                if !layer.is_structured() {
                    output::warning(&format!(
                        "{display_name}: no structured reply, recovered via {layer}"
                    ));
                }
            }
            RunEvent::ReadFailed {
                display_name,
                error,
            } => {
                if let Some(s) = spinner.take() {
                    s.finish_and_clear();
                }
                output::warning(&format!("{display_name}: could not read file ({error})"));
            }
            RunEvent::ReportWritten { path, sections } => {
                output::dim(&format!("{sections} section(s) in {}", path.display()));
            }
        }
    }

    if let Some(s) = spinner {
        s.finish_and_clear();
    }
}

fn print_summary(summary: &RunSummary) {
    if summary.total() == 0 {
        output::dim("No candidate files found; wrote the placeholder report.");
        return;
    }

    let mut table = output::table();
    output::table_header(&mut table, &["File", "Result"]);
    let mut items = Vec::with_capacity(summary.total());
    for file in &summary.files {
        output::table_row(&mut table, &file.display_name, &[describe(file.status)]);
        items.push(serde_json::json!({
            "file": file.display_name,
            "result": file.status.as_str(),
        }));
    }
    output::table_print(&table, "files", items);

    output::kv("analyzed", &summary.total().to_string());
    output::kv("structured", &summary.structured().to_string());
    output::kv("degraded", &summary.degraded().to_string());
    output::kv("read failures", &summary.read_failures().to_string());
}

fn describe(status: FileStatus) -> &'static str {
    use explain_llms::Layer;
    match status {
        FileStatus::Analyzed(Layer::FunctionCall) => "structured call",
        FileStatus::Analyzed(Layer::ContentJson) => "JSON content",
        FileStatus::Analyzed(Layer::Sections) => "recovered from text",
        FileStatus::Analyzed(Layer::Raw) => "raw response only",
        FileStatus::Analyzed(Layer::NoChoices) => "no choices returned",
        FileStatus::Analyzed(Layer::TransportFailure) => "request failed",
        FileStatus::ReadFailed => "read error",
    }
}
