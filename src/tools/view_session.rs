//! Screen capture tool.

use async_trait::async_trait;
use serde::Deserialize;

use super::{function_definition, parse_args, require_non_empty, Tool, ToolContext};
use crate::error::ToolError;
use crate::types::ToolDefinition;

/// `view_session`: current rendered screen of a session.
pub struct ViewSessionTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct Args {
    session_name: String,
    /// Keep color/attribute escapes instead of stripping them.
    raw: Option<bool>,
}

#[async_trait]
impl Tool for ViewSessionTool {
    fn name(&self) -> &'static str {
        "view_session"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "View the current screen content of a terminal session.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_name": {
                        "type": "string",
                        "description": "Name of the session."
                    },
                    "raw": {
                        "type": "boolean",
                        "description": "Keep ANSI color/attribute sequences in the output (default: false)."
                    }
                },
                "required": ["session_name"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: Args = parse_args(arguments)?;
        let name = require_non_empty("session_name", &args.session_name)?;
        let strip = match args.raw {
            Some(raw) => !raw,
            None => self.context.strip_ansi,
        };
        self.context
            .driver
            .capture(name, strip)
            .await
            .map_err(|e| ToolError::failed("failed to capture session", e))
    }
}
