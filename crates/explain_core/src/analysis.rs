//! The canonical per-file analysis.

use serde::{Deserialize, Serialize};

/// Wire key for the prose explanation.
pub const EXPLANATION_KEY: &str = "code_explanation";
/// Wire key for the exercise list.
pub const EXERCISES_KEY: &str = "suggested_exercises";
/// Wire key for the documentation list.
pub const DOCUMENTATION_KEY: &str = "recommended_documentation";

/// Three-part explanation of one source file.
///
/// All fields are always present. A failed analysis carries its diagnostic
/// in `explanation` and leaves both lists empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "code_explanation", default)]
    pub explanation: String,
    #[serde(rename = "suggested_exercises", default)]
    pub exercises: Vec<String>,
    #[serde(rename = "recommended_documentation", default)]
    pub documentation: Vec<String>,
}

impl AnalysisResult {
    pub fn new(
        explanation: impl Into<String>,
        exercises: Vec<String>,
        documentation: Vec<String>,
    ) -> Self {
        Self {
            explanation: explanation.into(),
            exercises,
            documentation,
        }
    }

    /// Result that only carries a diagnostic message.
    pub fn diagnostic(message: impl Into<String>) -> Self {
        Self::new(message, Vec::new(), Vec::new())
    }

    /// True when none of the three fields has content.
    pub fn is_empty(&self) -> bool {
        self.explanation.is_empty() && self.exercises.is_empty() && self.documentation.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_wire_keys() {
        let result = AnalysisResult::new("x", vec!["a".into()], vec![]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value[EXPLANATION_KEY], "x");
        assert_eq!(value[EXERCISES_KEY][0], "a");
        assert!(value[DOCUMENTATION_KEY].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_fills_missing_fields() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"code_explanation":"only this"}"#).unwrap();
        assert_eq!(result.explanation, "only this");
        assert!(result.exercises.is_empty());
        assert!(result.documentation.is_empty());
    }

    #[test]
    fn test_diagnostic_has_empty_lists() {
        let result = AnalysisResult::diagnostic("boom");
        assert_eq!(result.explanation, "boom");
        assert!(result.exercises.is_empty());
        assert!(result.documentation.is_empty());
        assert!(!result.is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(AnalysisResult::default().is_empty());
    }
}
