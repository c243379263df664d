//! Report assembly: one human-readable section per analyzed file.

use std::io::Write;
use std::path::Path;

use crate::analysis::AnalysisResult;
use crate::error::Result;

const DEFAULT_PLACEHOLDER: &str = "No source files found to analyze.\n";

/// One section of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    Analysis {
        filename: String,
        result: AnalysisResult,
    },
    ReadFailure {
        filename: String,
        error: String,
    },
}

impl ReportEntry {
    pub fn analysis(filename: impl Into<String>, result: AnalysisResult) -> Self {
        Self::Analysis {
            filename: filename.into(),
            result,
        }
    }

    pub fn read_failure(filename: impl Into<String>, error: impl ToString) -> Self {
        Self::ReadFailure {
            filename: filename.into(),
            error: error.to_string(),
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Self::Analysis { filename, .. } | Self::ReadFailure { filename, .. } => filename,
        }
    }

    /// Render this entry as a report section.
    pub fn render(&self) -> String {
        match self {
            Self::Analysis { filename, result } => render_analysis(filename, result),
            Self::ReadFailure { filename, error } => {
                format!("## {filename}\nError reading file: {error}\n")
            }
        }
    }
}

fn render_analysis(filename: &str, result: &AnalysisResult) -> String {
    let mut lines = vec![
        format!("## {filename}"),
        String::new(),
        "### Code Explanation".to_string(),
    ];

    let explanation = result.explanation.trim();
    lines.push(if explanation.is_empty() {
        "No explanation provided.".to_string()
    } else {
        explanation.to_string()
    });

    lines.push(String::new());
    lines.push("### Suggested Exercises".to_string());
    push_numbered(&mut lines, &result.exercises, "No exercises suggested.");

    lines.push(String::new());
    lines.push("### Recommended Documentation".to_string());
    push_numbered(&mut lines, &result.documentation, "No documentation suggested.");

    lines.push("\n---\n".to_string());
    lines.join("\n")
}

fn push_numbered(lines: &mut Vec<String>, items: &[String], placeholder: &str) {
    if items.is_empty() {
        lines.push(placeholder.to_string());
    } else {
        lines.extend(
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| format!("{}. {}", idx + 1, item)),
        );
    }
}

/// Ordered collection of report sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    entries: Vec<ReportEntry>,
    placeholder: String,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text rendered when the report has no entries.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the full report text. Pure: same entries, same bytes.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return self.placeholder.clone();
        }
        self.entries
            .iter()
            .map(ReportEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<ReportEntry> for Report {
    fn from_iter<I: IntoIterator<Item = ReportEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

/// Render `(filename, result)` pairs as report text.
pub fn assemble(results: &[(String, AnalysisResult)]) -> String {
    results
        .iter()
        .map(|(filename, result)| ReportEntry::analysis(filename.clone(), result.clone()))
        .collect::<Report>()
        .render()
}

/// Write `report` to `path` in one step: a sibling temp file is renamed over the target.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(report.render().as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), sections = report.len(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisResult {
        AnalysisResult::new(
            "  Adds two numbers.  ",
            vec!["Add a third argument".into(), "Handle floats".into()],
            vec!["https://docs.python.org/3/".into()],
        )
    }

    #[test]
    fn test_analysis_section_layout() {
        let text = ReportEntry::analysis("math.py", sample()).render();
        let expected = "## math.py\n\
                        \n\
                        ### Code Explanation\n\
                        Adds two numbers.\n\
                        \n\
                        ### Suggested Exercises\n\
                        1. Add a third argument\n\
                        2. Handle floats\n\
                        \n\
                        ### Recommended Documentation\n\
                        1. https://docs.python.org/3/\n\
                        \n\
                        ---\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_fields_use_placeholders() {
        let text = ReportEntry::analysis("empty.sql", AnalysisResult::default()).render();
        assert!(text.contains("### Code Explanation\nNo explanation provided.\n"));
        assert!(text.contains("### Suggested Exercises\nNo exercises suggested.\n"));
        assert!(text.contains("### Recommended Documentation\nNo documentation suggested.\n"));
    }

    #[test]
    fn test_read_failure_section() {
        let entry = ReportEntry::read_failure("locked.py", "permission denied");
        assert_eq!(
            entry.render(),
            "## locked.py\nError reading file: permission denied\n"
        );
        assert_eq!(entry.filename(), "locked.py");
    }

    #[test]
    fn test_sections_joined_in_order() {
        let results = vec![
            ("a.py".to_string(), sample()),
            ("b.py".to_string(), AnalysisResult::diagnostic("Raw response:\nhi")),
        ];
        let text = assemble(&results);
        let a = text.find("## a.py").unwrap();
        let b = text.find("## b.py").unwrap();
        assert!(a < b);
        assert!(text.contains("---\n\n## b.py"));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let results = vec![
            ("a.py".to_string(), sample()),
            ("b.sql".to_string(), AnalysisResult::default()),
        ];
        assert_eq!(assemble(&results), assemble(&results));
    }

    #[test]
    fn test_empty_report_uses_placeholder() {
        assert_eq!(Report::new().render(), "No source files found to analyze.\n");
        let report = Report::new().with_placeholder("No .py or .sql files found to analyze.\n");
        assert_eq!(report.render(), "No .py or .sql files found to analyze.\n");
    }

    #[test]
    fn test_write_report_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale").unwrap();

        let mut report = Report::new();
        report.push(ReportEntry::analysis("a.py", sample()));
        write_report(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, report.render());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
