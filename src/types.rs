//! Wire types for the tool catalogue and batch request/response lines.
//!
//! These serialize directly to the JSON shapes printed by `ttypilot tools`
//! and exchanged line-by-line by `ttypilot batch`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tool definitions
// ---------------------------------------------------------------------------

/// Catalogue entry describing one callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool definition type; currently always `"function"`.
    #[serde(rename = "type")]
    pub tool_type: String, // "function"
    /// Function schema published to callers.
    pub function: FunctionDefinition,
}

/// The schema of a callable function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Exposed function/tool name.
    pub name: String,
    /// Natural-language description of tool behavior.
    pub description: String,
    /// JSON Schema object describing the parameters.
    pub parameters: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Batch requests
// ---------------------------------------------------------------------------

/// One request line read by batch mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool: String,
    /// Arguments object; an absent field means `{}`.
    #[serde(default = "empty_object")]
    pub arguments: serde_json::Value,
}

/// One response line written by batch mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolReply {
    pub tool: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolReply {
    pub fn success(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            ok: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(tool: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            ok: false,
            output: None,
            error: Some(error.into()),
        }
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
