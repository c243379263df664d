//! `explain-code schema`: print the `return_analysis` declaration.

use anyhow::Result;
use explain_llms::{analysis_function, SchemaStyle, ToolDefinition};

use crate::output;

pub fn handle(style: SchemaStyle) -> Result<()> {
    let value = match style {
        SchemaStyle::Functions => serde_json::to_value(analysis_function())?,
        SchemaStyle::Tools => serde_json::to_value(ToolDefinition {
            type_: "function".to_string(),
            function: analysis_function(),
        })?,
    };
    output::json_pretty(&value);
    Ok(())
}
