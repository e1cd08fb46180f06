//! Named tool surface over the session core.
//!
//! Each tool publishes a JSON-schema definition and executes from a JSON
//! arguments string, returning plain text. The command-line driver routes
//! every subcommand through [`ToolRegistry`].

pub mod git_patch;
pub mod send_keys;
pub mod session;
pub mod view_session;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::driver::SessionDriver;
use crate::error::ToolError;
use crate::host::TerminalHost;
use crate::tracker::{OperationStore, PromptTracker};
use crate::types::{FunctionDefinition, ToolDefinition};

// ---------------------------------------------------------------------------
// Tool trait
// ---------------------------------------------------------------------------

/// A named operation callable with JSON arguments.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name callers use to invoke the tool.
    fn name(&self) -> &'static str;

    /// Catalogue definition with the argument schema.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON arguments string.
    async fn execute(&self, arguments: &str) -> Result<String, ToolError>;
}

// ---------------------------------------------------------------------------
// Tool registry
// ---------------------------------------------------------------------------

/// Registry of available tools, in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.tools.push(Box::new(tool));
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Find a tool by name and execute it.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ToolError::ExecutionFailed(format!("unknown tool: {name}")))?;
        tool.execute(arguments).await
    }

    /// True if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shared context
// ---------------------------------------------------------------------------

/// Core handles and configured defaults shared by every tool.
#[derive(Clone)]
pub struct ToolContext {
    pub driver: SessionDriver,
    pub tracker: Arc<PromptTracker>,
    /// `send_commands` inter-token delay when the caller omits one.
    pub default_delay: Duration,
    /// Strip SGR sequences from captures unless a caller asks for raw output.
    pub strip_ansi: bool,
    pub git_add_patch_command: String,
}

impl ToolContext {
    /// Driver, tracker and defaults built from loaded config.
    pub fn from_config(host: Arc<dyn TerminalHost>, config: &Config) -> Self {
        let driver = SessionDriver::new(host, config.driver_options());
        let tracker = PromptTracker::new(
            driver.clone(),
            Arc::new(OperationStore::new()),
            config.tracker_options(),
        );
        Self {
            driver,
            tracker: Arc::new(tracker),
            default_delay: config.default_delay(),
            strip_ansi: config.capture.strip_ansi,
            git_add_patch_command: config.interactive.git_add_patch_command.clone(),
        }
    }
}

/// Registry with every session tool wired to `context`.
pub fn build_registry(context: ToolContext) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(session::StartSessionTool {
        context: context.clone(),
    });
    registry.register(send_keys::SendKeysTool {
        context: context.clone(),
    });
    registry.register(send_keys::SendCommandsTool {
        context: context.clone(),
    });
    registry.register(view_session::ViewSessionTool {
        context: context.clone(),
    });
    registry.register(session::ListSessionsTool {
        context: context.clone(),
    });
    registry.register(session::JoinSessionTool {
        context: context.clone(),
    });
    registry.register(session::CloseSessionTool {
        context: context.clone(),
    });
    registry.register(git_patch::GitAddPatchTool {
        context: context.clone(),
    });
    registry.register(git_patch::GitAddPatchRespondTool {
        context: context.clone(),
    });
    registry.register(git_patch::GitAddPatchStatusTool { context });
    registry
}

pub(crate) fn function_definition(
    name: &str,
    description: &str,
    parameters: serde_json::Value,
) -> ToolDefinition {
    ToolDefinition {
        tool_type: "function".into(),
        function: FunctionDefinition {
            name: name.into(),
            description: description.into(),
            parameters,
        },
    }
}

/// Parse a JSON arguments string into the tool's argument struct.
pub(crate) fn parse_args<T: DeserializeOwned>(arguments: &str) -> Result<T, ToolError> {
    let raw = if arguments.trim().is_empty() {
        "{}"
    } else {
        arguments
    };
    serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Reject a blank required string argument.
pub(crate) fn require_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::InvalidArguments(format!(
            "required argument '{field}' must not be empty"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{tool_context, FakeHost};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }
        fn definition(&self) -> ToolDefinition {
            function_definition("echo", "echoes arguments back", serde_json::json!({}))
        }
        async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
            Ok(arguments.to_string())
        }
    }

    #[test]
    fn context_from_config_carries_configured_defaults() {
        let mut config = Config::default();
        config.timing.default_delay_ms = 25;
        config.capture.strip_ansi = false;
        config.interactive.git_add_patch_command = "git add --patch".to_string();
        let context = ToolContext::from_config(Arc::new(FakeHost::new()), &config);
        assert_eq!(context.default_delay, Duration::from_millis(25));
        assert!(!context.strip_ansi);
        assert_eq!(context.git_add_patch_command, "git add --patch");
        assert_eq!(context.driver.options(), config.driver_options());
    }

    #[test]
    fn new_registry_is_empty() {
        assert!(ToolRegistry::new().is_empty());
        assert!(ToolRegistry::default().is_empty());
    }

    #[tokio::test]
    async fn execute_known_tool_returns_output() {
        let mut r = ToolRegistry::new();
        r.register(EchoTool);
        let out = r.execute("echo", r#"{"x":1}"#).await.unwrap();
        assert_eq!(out, r#"{"x":1}"#);
    }

    #[tokio::test]
    async fn execute_unknown_tool_returns_error() {
        let r = ToolRegistry::new();
        let err = r.execute("nonexistent", "{}").await.unwrap_err();
        assert!(err.to_string().contains("unknown tool"));
    }

    #[test]
    fn catalogue_lists_every_session_tool_in_order() {
        let registry = build_registry(tool_context(Arc::new(FakeHost::new())));
        let names: Vec<String> = registry
            .definitions()
            .into_iter()
            .map(|def| def.function.name)
            .collect();
        assert_eq!(
            names,
            [
                "start_session",
                "send_keys",
                "send_commands",
                "view_session",
                "list_sessions",
                "join_session",
                "close_session",
                "git_add_patch",
                "git_add_patch_respond",
                "git_add_patch_status",
            ]
        );
    }

    #[test]
    fn every_definition_is_an_object_schema() {
        let registry = build_registry(tool_context(Arc::new(FakeHost::new())));
        for def in registry.definitions() {
            assert_eq!(def.tool_type, "function");
            assert_eq!(def.function.parameters["type"], "object", "{}", def.function.name);
        }
    }

    #[test]
    fn blank_arguments_parse_as_empty_object() {
        #[derive(serde::Deserialize)]
        struct NoArgs {}
        assert!(parse_args::<NoArgs>("").is_ok());
        assert!(parse_args::<NoArgs>("not json").is_err());
    }

    #[test]
    fn blank_required_string_is_rejected() {
        let err = require_non_empty("session_name", "  ").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert_eq!(require_non_empty("session_name", "dev").unwrap(), "dev");
    }
}
