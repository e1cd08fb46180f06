//! Interactive `git add -p` staging, driven through the prompt tracker.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::UNIX_EPOCH;

use super::{function_definition, parse_args, require_non_empty, Tool, ToolContext};
use crate::error::ToolError;
use crate::tracker::OperationRecord;
use crate::types::ToolDefinition;

/// Operation id prefix for staging sessions.
pub const GIT_ADD_PATCH_PREFIX: &str = "git-add-patch";

/// `git_add_patch`: launch staging and return its operation id.
pub struct GitAddPatchTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct StartArgs {
    working_directory: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

#[async_trait]
impl Tool for GitAddPatchTool {
    fn name(&self) -> &'static str {
        "git_add_patch"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Start interactive git staging (git add -p) and return an operation ID for git_add_patch_respond.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "working_directory": {
                        "type": "string",
                        "description": "Working directory for the git operation (default: current directory)."
                    },
                    "args": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Additional arguments for git add -p (e.g., [\"file1.txt\", \"*.js\"])."
                    }
                }
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: StartArgs = parse_args(arguments)?;
        let working_dir = args
            .working_directory
            .as_deref()
            .filter(|dir| !dir.trim().is_empty());
        let started = self
            .context
            .tracker
            .start(
                GIT_ADD_PATCH_PREFIX,
                &self.context.git_add_patch_command,
                working_dir,
                &args.args,
            )
            .await
            .map_err(|e| ToolError::failed("failed to start git add -p", e))?;
        Ok(format!(
            "Git add -p started with session ID: {}\n\nCurrent screen:\n{}",
            started.id, started.screen
        ))
    }
}

/// `git_add_patch_respond`: answer the current staging prompt.
pub struct GitAddPatchRespondTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct RespondArgs {
    session_id: String,
    response: String,
}

#[async_trait]
impl Tool for GitAddPatchRespondTool {
    fn name(&self) -> &'static str {
        "git_add_patch_respond"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Send a response to an interactive git add -p operation.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_id": {
                        "type": "string",
                        "description": "Operation ID returned from git_add_patch."
                    },
                    "response": {
                        "type": "string",
                        "description": "Response to send: 'y' (yes), 'n' (no), 's' (split), 'q' (quit), 'a' (all), 'd' (done), '?' (help)."
                    }
                },
                "required": ["session_id", "response"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: RespondArgs = parse_args(arguments)?;
        let id = require_non_empty("session_id", &args.session_id)?;
        let response = self
            .context
            .tracker
            .respond(id, &args.response)
            .await
            .map_err(|e| ToolError::failed("failed to respond to git add -p", e))?;
        Ok(format!(
            "Response '{}' sent to git add -p operation.\n\nCurrent screen:\n{}",
            args.response, response.screen
        ))
    }
}

/// `git_add_patch_status`: read-only view of one or all staging operations.
pub struct GitAddPatchStatusTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct StatusArgs {
    session_id: Option<String>,
}

#[async_trait]
impl Tool for GitAddPatchStatusTool {
    fn name(&self) -> &'static str {
        "git_add_patch_status"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Report the status (active, finished, error) of git add -p operations. Without session_id, lists every operation started by this process.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_id": {
                        "type": "string",
                        "description": "Operation ID returned from git_add_patch (optional)."
                    }
                }
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: StatusArgs = parse_args(arguments)?;
        let tracker = &self.context.tracker;
        match args.session_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                let record = tracker
                    .status(id)
                    .await
                    .map_err(|e| ToolError::failed("failed to read git add -p status", e))?;
                Ok(status_line(id, &record))
            }
            None => {
                let records = tracker.store().snapshot().await;
                if records.is_empty() {
                    return Ok("No git add -p operations.".to_string());
                }
                Ok(records
                    .iter()
                    .map(|(id, record)| status_line(id, record))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }
}

fn status_line(id: &str, record: &OperationRecord) -> String {
    let started = record
        .started_at
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!(
        "{id}: {} (started {started}, dir {})",
        record.status,
        record.working_dir.as_deref().unwrap_or(".")
    )
}
