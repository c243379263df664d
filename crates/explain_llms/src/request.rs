//! Request builder: prompts and the `return_analysis` schema.

use explain_core::analysis::{DOCUMENTATION_KEY, EXERCISES_KEY, EXPLANATION_KEY};
use serde_json::json;

use crate::types::{
    ChatMessage, ChatRequest, FunctionDefinition, RequestParams, SchemaStyle, ToolDefinition,
};

/// Name of the function the model is asked to call.
pub const ANALYSIS_FUNCTION_NAME: &str = "return_analysis";

/// System persona for every analysis request.
pub const SYSTEM_PROMPT: &str = "You are a senior code reviewer and teacher. Reply in English.";

/// The structured-output schema: explanation, exercises, documentation.
pub fn analysis_function() -> FunctionDefinition {
    FunctionDefinition {
        name: ANALYSIS_FUNCTION_NAME.to_string(),
        description:
            "Return a structured analysis for a code file: explanation, exercises, docs."
                .to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                EXPLANATION_KEY: {
                    "type": "string",
                    "description": "A clear, concise explanation of what the code does (in English)."
                },
                EXERCISES_KEY: {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Two or three practical exercises to practice the concepts in the code."
                },
                DOCUMENTATION_KEY: {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A few URLs or titles of official docs/tutorials to study next."
                }
            },
            "required": [EXPLANATION_KEY, EXERCISES_KEY, DOCUMENTATION_KEY]
        }),
    }
}

/// User message: instructions followed by the file between `---` markers.
pub fn build_user_prompt(filename: &str, code: &str) -> String {
    let mut parts = Vec::new();
    parts.push(format!("Please analyze the file named {filename}."));
    parts.push(
        "Do NOT provide direct solutions to exercises (if the file contains exercise problems)."
            .to_string(),
    );
    parts.push(format!(
        "Return structured output by 'calling' the function {ANALYSIS_FUNCTION_NAME} with the following fields: \
         {EXPLANATION_KEY} (string), {EXERCISES_KEY} (array of 2-3 strings), \
         {DOCUMENTATION_KEY} (array of 2-4 strings with titles or URLs)."
    ));
    parts.push("If you cannot call the function, reply with a JSON object with the same keys.".to_string());
    format!("{}\n\n---\n\n{}\n\n---", parts.join(" "), code)
}

/// Assemble the full chat request for one file.
pub fn build_analysis_request(params: &RequestParams, filename: &str, code: &str) -> ChatRequest {
    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_prompt(filename, code)),
    ];

    let (functions, tools, tool_choice) = match params.schema_style {
        SchemaStyle::Functions => (Some(vec![analysis_function()]), None, None),
        SchemaStyle::Tools => (
            None,
            Some(vec![ToolDefinition {
                type_: "function".to_string(),
                function: analysis_function(),
            }]),
            Some(json!({
                "type": "function",
                "function": { "name": ANALYSIS_FUNCTION_NAME }
            })),
        ),
    };

    ChatRequest {
        model: params.model.clone(),
        messages,
        functions,
        tools,
        tool_choice,
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        stream: false,
    }
}
