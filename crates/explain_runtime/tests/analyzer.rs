//! Pipeline tests against an in-process transport.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use explain_core::{RunConfig, SourceFile};
use explain_llms::{ChatRequest, Error, Layer, RequestParams, Transport};
use explain_runtime::{Analyzer, FileStatus, RunEvent};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::mpsc;

type Responder = dyn Fn(&str) -> explain_llms::Result<Value> + Send + Sync;

/// Records every user prompt and answers through `respond`.
struct MockTransport {
    prompts: Mutex<Vec<String>>,
    respond: Box<Responder>,
}

impl MockTransport {
    fn new(respond: impl Fn(&str) -> explain_llms::Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Answers every request with a structured call naming the file.
    fn structured() -> Self {
        Self::new(|prompt| Ok(call_response(&format!("Explains {}", file_in(prompt)))))
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn endpoint(&self) -> String {
        "mock://chat/completions".to_string()
    }

    async fn send(&self, request: &ChatRequest) -> explain_llms::Result<Value> {
        let prompt = request.messages[1].content.clone();
        self.prompts.lock().unwrap().push(prompt.clone());
        (self.respond)(&prompt)
    }
}

fn file_in(prompt: &str) -> &str {
    prompt
        .strip_prefix("Please analyze the file named ")
        .and_then(|rest| rest.split_once(". "))
        .map(|(name, _)| name)
        .unwrap_or("?")
}

fn call_response(explanation: &str) -> Value {
    let arguments = json!({
        "code_explanation": explanation,
        "suggested_exercises": ["Write a test"],
        "recommended_documentation": ["https://docs.python.org/3/"]
    });
    json!({
        "choices": [{
            "message": {
                "content": null,
                "function_call": { "name": "return_analysis", "arguments": arguments.to_string() }
            }
        }]
    })
}

fn analyzer(transport: &Arc<MockTransport>) -> Analyzer {
    Analyzer::new(transport.clone(), RequestParams::default())
}

fn write(root: &TempDir, rel: &str, contents: &str) -> PathBuf {
    let path = root.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "main.py", "print('hi')\n");
    write(&dir, "schema.sql", "CREATE TABLE t (id INT);\n");
    write(&dir, "pkg/a.py", "def a():\n    return 1\n");
    write(&dir, "venv/lib/site.py", "ignored = True\n");
    write(&dir, "notes.md", "# not code\n");
    dir
}

#[tokio::test]
async fn test_explain_writes_sections_in_traversal_order() {
    let dir = repo();
    let transport = Arc::new(MockTransport::structured());
    let report_path = dir.path().join("ai_explanations.txt");
    let config = RunConfig::new(dir.path()).with_report_path(&report_path);

    let summary = analyzer(&transport).explain(&config).await.unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.structured(), 3);
    assert_eq!(summary.report_path, report_path);

    let report = fs::read_to_string(&report_path).unwrap();
    let main = report.find("## main.py").unwrap();
    let schema = report.find("## schema.sql").unwrap();
    let nested = report.find("## pkg/a.py").unwrap();
    assert!(main < schema && schema < nested);
    assert!(report.contains("### Code Explanation\nExplains pkg/a.py\n"));
    assert!(report.contains("1. Write a test"));
    assert!(!report.contains("site.py"));
    assert!(!report.contains("notes.md"));
}

#[tokio::test]
async fn test_prompt_carries_name_and_contents() {
    let dir = repo();
    let transport = Arc::new(MockTransport::structured());
    let config = RunConfig::new(dir.path()).with_report_path(dir.path().join("out.txt"));

    analyzer(&transport).explain(&config).await.unwrap();

    let prompts = transport.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[2].starts_with("Please analyze the file named pkg/a.py."));
    assert!(prompts[2].contains("\n\n---\n\ndef a():\n    return 1\n\n\n---"));
}

#[tokio::test]
async fn test_read_failure_does_not_stop_the_run() {
    let dir = repo();
    let transport = Arc::new(MockTransport::structured());
    let files = vec![
        SourceFile {
            path: dir.path().join("gone.py"),
            display_name: "gone.py".into(),
        },
        SourceFile {
            path: dir.path().join("main.py"),
            display_name: "main.py".into(),
        },
    ];

    let (report, outcomes) = analyzer(&transport).run(&files).await;

    assert_eq!(outcomes[0].status, FileStatus::ReadFailed);
    assert_eq!(outcomes[1].status, FileStatus::Analyzed(Layer::FunctionCall));
    assert_eq!(transport.prompts().len(), 1);

    let text = report.render();
    assert!(text.starts_with("## gone.py\nError reading file: "));
    assert!(text.contains("## main.py\n\n### Code Explanation\nExplains main.py"));
}

#[tokio::test]
async fn test_transport_failure_becomes_diagnostic() {
    let dir = repo();
    let transport = Arc::new(MockTransport::new(|prompt| {
        if file_in(prompt) == "schema.sql" {
            Err(Error::Status {
                status: 502,
                body: "bad gateway".into(),
            })
        } else {
            Ok(call_response("fine"))
        }
    }));
    let report_path = dir.path().join("report.txt");
    let config = RunConfig::new(dir.path()).with_report_path(&report_path);

    let summary = analyzer(&transport).explain(&config).await.unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.degraded(), 1);
    assert_eq!(
        summary.files[1].status,
        FileStatus::Analyzed(Layer::TransportFailure)
    );

    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains(
        "## schema.sql\n\n### Code Explanation\nChat request failed: chat endpoint returned 502: bad gateway\n"
    ));
    assert!(report.contains("No exercises suggested."));
}

#[tokio::test]
async fn test_unstructured_reply_is_recovered() {
    let dir = TempDir::new().unwrap();
    write(&dir, "only.py", "x = 1\n");
    let transport = Arc::new(MockTransport::new(|_| {
        Ok(json!({
            "choices": [{ "message": { "content": "Sets x.\nExercises\n- Set y\nDocumentation\n- PEP 8" } }]
        }))
    }));
    let report_path = dir.path().join("out.txt");
    let config = RunConfig::new(dir.path()).with_report_path(&report_path);

    let summary = analyzer(&transport).explain(&config).await.unwrap();

    assert_eq!(summary.files[0].status, FileStatus::Analyzed(Layer::Sections));
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("### Code Explanation\nSets x.\n"));
    assert!(report.contains("### Suggested Exercises\n1. Set y\n"));
    assert!(report.contains("### Recommended Documentation\n1. PEP 8\n"));
}

#[tokio::test]
async fn test_empty_tree_writes_placeholder() {
    let dir = TempDir::new().unwrap();
    write(&dir, "README.md", "nothing to see\n");
    let transport = Arc::new(MockTransport::structured());
    let report_path = dir.path().join("ai_explanations.txt");
    let config = RunConfig::new(dir.path()).with_report_path(&report_path);

    let summary = analyzer(&transport).explain(&config).await.unwrap();

    assert_eq!(summary.total(), 0);
    assert!(transport.prompts().is_empty());
    assert_eq!(
        fs::read_to_string(&report_path).unwrap(),
        "No .py or .sql files found to analyze.\n"
    );
}

#[tokio::test]
async fn test_report_file_is_never_analyzed() {
    let dir = TempDir::new().unwrap();
    write(&dir, "app.py", "pass\n");
    let report_path = write(&dir, "explanations.py", "stale report\n");
    let transport = Arc::new(MockTransport::structured());
    let config = RunConfig::new(dir.path()).with_report_path(&report_path);

    let summary = analyzer(&transport).explain(&config).await.unwrap();

    assert_eq!(summary.total(), 1);
    assert_eq!(summary.files[0].display_name, "app.py");
    let report = fs::read_to_string(&report_path).unwrap();
    assert!(!report.contains("stale report"));
}

#[tokio::test]
async fn test_non_utf8_file_is_read_lossily() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("latin.py"), b"name = '\xe9t\xe9'\n").unwrap();
    let transport = Arc::new(MockTransport::structured());
    let config = RunConfig::new(dir.path()).with_report_path(dir.path().join("out.txt"));

    let summary = analyzer(&transport).explain(&config).await.unwrap();

    assert_eq!(summary.structured(), 1);
    assert!(transport.prompts()[0].contains('\u{FFFD}'));
}

#[tokio::test]
async fn test_events_follow_progress() {
    let dir = repo();
    let transport = Arc::new(MockTransport::structured());
    let (tx, mut rx) = mpsc::channel(64);
    let report_path = dir.path().join("out.txt");
    let config = RunConfig::new(dir.path()).with_report_path(&report_path);

    analyzer(&transport)
        .with_events(tx)
        .explain(&config)
        .await
        .unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    let started: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::FileStarted {
                index,
                total,
                display_name,
                ..
            } => Some((*index, *total, display_name.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        started,
        vec![
            (0, 3, "main.py".to_string()),
            (1, 3, "schema.sql".to_string()),
            (2, 3, "pkg/a.py".to_string()),
        ]
    );
    assert!(matches!(
        events.last(),
        Some(RunEvent::ReportWritten { sections: 3, .. })
    ));
}

#[tokio::test]
async fn test_missing_root_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let transport = Arc::new(MockTransport::structured());
    let config = RunConfig::new(dir.path().join("nope"));

    let err = analyzer(&transport).explain(&config).await.unwrap_err();

    assert!(err.is_configuration());
    assert!(transport.prompts().is_empty());
}
