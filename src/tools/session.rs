//! Session lifecycle tools: start, list, join, close.

use async_trait::async_trait;
use serde::Deserialize;

use super::{function_definition, parse_args, require_non_empty, Tool, ToolContext};
use crate::error::ToolError;
use crate::types::ToolDefinition;

/// `start_session`: create a detached session, optionally running a command.
pub struct StartSessionTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct StartArgs {
    session_name: String,
    command: Option<String>,
    working_directory: Option<String>,
}

#[async_trait]
impl Tool for StartSessionTool {
    fn name(&self) -> &'static str {
        "start_session"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Start a new terminal session using tmux.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_name": {
                        "type": "string",
                        "description": "Name of the session to create."
                    },
                    "command": {
                        "type": "string",
                        "description": "Optional command to run (defaults to shell)."
                    },
                    "working_directory": {
                        "type": "string",
                        "description": "Working directory for the session."
                    }
                },
                "required": ["session_name"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: StartArgs = parse_args(arguments)?;
        let name = require_non_empty("session_name", &args.session_name)?;
        self.context
            .driver
            .create(
                name,
                args.command.as_deref(),
                args.working_directory.as_deref(),
            )
            .await
            .map_err(|e| ToolError::failed("failed to start session", e))?;
        Ok(format!("Session '{name}' started successfully"))
    }
}

/// `list_sessions`: host listing, unchanged.
pub struct ListSessionsTool {
    pub context: ToolContext,
}

#[async_trait]
impl Tool for ListSessionsTool {
    fn name(&self) -> &'static str {
        "list_sessions"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "List all active terminal sessions.",
            serde_json::json!({ "type": "object", "properties": {} }),
        )
    }

    async fn execute(&self, _arguments: &str) -> Result<String, ToolError> {
        self.context
            .driver
            .list()
            .await
            .map_err(|e| ToolError::failed("failed to list sessions", e))
    }
}

/// `join_session`: attach to an existing session, optionally under a new name.
pub struct JoinSessionTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct JoinArgs {
    session_name: String,
    new_session_name: Option<String>,
}

#[async_trait]
impl Tool for JoinSessionTool {
    fn name(&self) -> &'static str {
        "join_session"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Join an existing terminal session. With new_session_name, a second session sharing the same windows is created so another client can view and drive the same program.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_name": {
                        "type": "string",
                        "description": "Name of the existing session to join."
                    },
                    "new_session_name": {
                        "type": "string",
                        "description": "Name for this client's view of the session (optional)."
                    }
                },
                "required": ["session_name"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: JoinArgs = parse_args(arguments)?;
        let name = require_non_empty("session_name", &args.session_name)?;
        let joined = self
            .context
            .driver
            .attach(name, args.new_session_name.as_deref())
            .await
            .map_err(|e| ToolError::failed("failed to join session", e))?;
        if joined == name {
            Ok(format!("Joined session '{name}'"))
        } else {
            Ok(format!("Joined session '{name}' as '{joined}'"))
        }
    }
}

/// `close_session`: kill a session.
pub struct CloseSessionTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct CloseArgs {
    session_name: String,
}

#[async_trait]
impl Tool for CloseSessionTool {
    fn name(&self) -> &'static str {
        "close_session"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Close a terminal session.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_name": {
                        "type": "string",
                        "description": "Name of the session to close."
                    }
                },
                "required": ["session_name"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: CloseArgs = parse_args(arguments)?;
        let name = require_non_empty("session_name", &args.session_name)?;
        self.context
            .driver
            .destroy(name)
            .await
            .map_err(|e| ToolError::failed("failed to close session", e))?;
        Ok(format!("Session '{name}' closed successfully"))
    }
}
