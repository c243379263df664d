//! Response normalizer: untrusted chat-completion JSON in, [`AnalysisResult`] out.
//!
//! Layers run in order; the first that yields a value wins:
//!
//! 1. structured call arguments (`function_call` / `tool_calls`)
//! 2. assistant content decoded as a JSON object with `code_explanation`
//! 3. assistant content split into sections by heading lines
//! 4. diagnostic fallback carrying the raw text
//!
//! Nothing here returns an error. Malformed input only moves the response
//! further down the chain.

use explain_core::analysis::{DOCUMENTATION_KEY, EXERCISES_KEY, EXPLANATION_KEY};
use explain_core::AnalysisResult;
use serde_json::{Map, Value};

use crate::error::Result;

/// Which layer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    FunctionCall,
    ContentJson,
    Sections,
    Raw,
    NoChoices,
    TransportFailure,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::FunctionCall => "function_call",
            Layer::ContentJson => "content_json",
            Layer::Sections => "sections",
            Layer::Raw => "raw",
            Layer::NoChoices => "no_choices",
            Layer::TransportFailure => "transport_failure",
        }
    }

    /// True when the endpoint honored the structured contract (layers 1 and 2).
    pub fn is_structured(&self) -> bool {
        matches!(self, Layer::FunctionCall | Layer::ContentJson)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized result plus the layer it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub result: AnalysisResult,
    pub layer: Layer,
}

impl Normalized {
    fn new(result: AnalysisResult, layer: Layer) -> Self {
        Self { result, layer }
    }
}

/// Normalize a raw chat-completion response. Never fails.
pub fn normalize(response: &Value) -> AnalysisResult {
    normalize_traced(response).result
}

/// Normalize the outcome of a transport call, turning failures into a diagnostic.
pub fn normalize_outcome(outcome: Result<Value>) -> AnalysisResult {
    normalize_outcome_traced(outcome).result
}

pub fn normalize_outcome_traced(outcome: Result<Value>) -> Normalized {
    match outcome {
        Ok(response) => normalize_traced(&response),
        Err(err) => Normalized::new(
            AnalysisResult::diagnostic(format!("Chat request failed: {err}")),
            Layer::TransportFailure,
        ),
    }
}

/// [`normalize`] that also reports the winning layer.
pub fn normalize_traced(response: &Value) -> Normalized {
    let Some(choice) = first_choice(response) else {
        tracing::debug!("response has no choices");
        return Normalized::new(
            AnalysisResult::diagnostic(format!(
                "No choices returned from the chat endpoint: {response}"
            )),
            Layer::NoChoices,
        );
    };

    let normalized = from_function_call(choice)
        .map(|r| Normalized::new(r, Layer::FunctionCall))
        .or_else(|| from_json_content(choice).map(|r| Normalized::new(r, Layer::ContentJson)))
        .or_else(|| from_sections(choice).map(|r| Normalized::new(r, Layer::Sections)))
        .unwrap_or_else(|| Normalized::new(raw_fallback(choice, response), Layer::Raw));

    tracing::debug!(layer = %normalized.layer, "response normalized");
    normalized
}

fn first_choice(response: &Value) -> Option<&Value> {
    response.get("choices")?.as_array()?.first()
}

// ── Layer 1: structured call ───────────────────────────────────────

fn from_function_call(choice: &Value) -> Option<AnalysisResult> {
    let call = locate_call(choice)?;
    let fields = decode_arguments(call.get("arguments")?)?;
    Some(coerce(&fields))
}

/// `message.function_call`, then `choice.function_call`, then the first
/// `message.tool_calls[].function`.
fn locate_call(choice: &Value) -> Option<&Value> {
    let message = choice.get("message");
    message
        .and_then(|m| m.get("function_call"))
        .filter(|v| is_truthy(v))
        .or_else(|| choice.get("function_call").filter(|v| is_truthy(v)))
        .or_else(|| {
            message
                .and_then(|m| m.get("tool_calls"))
                .and_then(Value::as_array)
                .and_then(|calls| calls.first())
                .and_then(|call| call.get("function"))
                .filter(|v| is_truthy(v))
        })
}

fn decode_arguments(arguments: &Value) -> Option<Map<String, Value>> {
    let decoded = match arguments {
        Value::Object(map) => Value::Object(map.clone()),
        Value::String(text) => parse_json_lenient(text)?,
        _ => return None,
    };
    match decoded {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Strict parse, then the slice from the first `{` to the last `}`.
fn parse_json_lenient(text: &str) -> Option<Value> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(error = %err, "structured call arguments are not JSON");
            None
        }
    }
}

// ── Layer 2: content as JSON ───────────────────────────────────────

fn from_json_content(choice: &Value) -> Option<AnalysisResult> {
    let content = content_text(choice)?;
    match serde_json::from_str::<Value>(strip_code_fence(&content)) {
        Ok(Value::Object(fields)) if fields.contains_key(EXPLANATION_KEY) => Some(coerce(&fields)),
        _ => None,
    }
}

/// `message.content`, else `choice.text`. Content-block arrays are joined.
fn content_text(choice: &Value) -> Option<String> {
    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(text_of)
        .or_else(|| choice.get("text").and_then(text_of))
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(blocks) => {
            let joined = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    // first line of the fence is the info string (`json`), if any
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

// ── Layer 3: heading split ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Explanation,
    Exercises,
    Documentation,
}

const EXERCISE_MARKERS: [&str; 3] = ["2.", "suggested exercises", "exercises"];
const DOCUMENTATION_MARKERS: [&str; 3] = ["3.", "recommended documentation", "documentation"];

impl Section {
    fn from_heading(line: &str) -> Option<Self> {
        let heading = line.trim().to_lowercase();
        if EXERCISE_MARKERS.iter().any(|m| heading.starts_with(m)) {
            Some(Section::Exercises)
        } else if DOCUMENTATION_MARKERS.iter().any(|m| heading.starts_with(m)) {
            Some(Section::Documentation)
        } else {
            None
        }
    }
}

struct SectionSplitter<'a> {
    current: Section,
    buffer: Vec<&'a str>,
    result: AnalysisResult,
}

impl<'a> SectionSplitter<'a> {
    fn new() -> Self {
        Self {
            current: Section::Explanation,
            buffer: Vec::new(),
            result: AnalysisResult::default(),
        }
    }

    fn feed(&mut self, line: &'a str) {
        match Section::from_heading(line) {
            Some(next) => {
                self.flush();
                self.current = next;
            }
            None => self.buffer.push(line),
        }
    }

    /// A non-empty buffer replaces the current section's value.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.buffer);
        match self.current {
            Section::Explanation => self.result.explanation = lines.join("\n").trim().to_string(),
            Section::Exercises => self.result.exercises = list_items(&lines),
            Section::Documentation => self.result.documentation = list_items(&lines),
        }
    }

    fn finish(mut self) -> AnalysisResult {
        self.flush();
        self.result
    }
}

fn list_items(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim_matches(|c| matches!(c, '-' | '*' | ' ')).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Line breaks are `\n`, `\r\n` or a lone `\r`.
fn split_sections(content: &str) -> AnalysisResult {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut splitter = SectionSplitter::new();
    for line in content.lines() {
        splitter.feed(line);
    }
    splitter.finish()
}

fn from_sections(choice: &Value) -> Option<AnalysisResult> {
    let result = split_sections(&content_text(choice)?);
    (!result.is_empty()).then_some(result)
}

// ── Layer 4: raw fallback ──────────────────────────────────────────

fn raw_fallback(choice: &Value, response: &Value) -> AnalysisResult {
    let raw = content_text(choice).unwrap_or_else(|| response.to_string());
    AnalysisResult::diagnostic(format!("Raw response:\n{raw}"))
}

// ── Coercion ───────────────────────────────────────────────────────

fn coerce(fields: &Map<String, Value>) -> AnalysisResult {
    AnalysisResult::new(
        text_field(fields.get(EXPLANATION_KEY)),
        list_field(fields.get(EXERCISES_KEY)),
        list_field(fields.get(DOCUMENTATION_KEY)),
    )
}

fn text_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn list_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
