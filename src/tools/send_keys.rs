//! Input tools.
//!
//! `send_keys` hands a string straight to the host's key mode, so host key
//! names such as `Enter` or `C-c` work as-is. `send_commands` runs an ordered
//! token list through the sequencer, where `<NAME>` tokens are symbolic and
//! everything else is typed literally.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{function_definition, parse_args, require_non_empty, Tool, ToolContext};
use crate::error::ToolError;
use crate::sequencer::{send_commands, SequenceOptions};
use crate::types::ToolDefinition;

/// `send_keys`: raw host key passthrough.
pub struct SendKeysTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct KeysArgs {
    session_name: String,
    keys: String,
}

#[async_trait]
impl Tool for SendKeysTool {
    fn name(&self) -> &'static str {
        "send_keys"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Send keystrokes to a terminal session using tmux key syntax (for example \"Enter\", \"C-c\", \"Up\").",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_name": {
                        "type": "string",
                        "description": "Name of the session."
                    },
                    "keys": {
                        "type": "string",
                        "description": "Keys to send to the session."
                    }
                },
                "required": ["session_name", "keys"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: KeysArgs = parse_args(arguments)?;
        let name = require_non_empty("session_name", &args.session_name)?;
        require_non_empty("keys", &args.keys)?;
        self.context
            .driver
            .inject_key(name, &args.keys)
            .await
            .map_err(|e| ToolError::failed("failed to send keys", e))?;
        Ok(format!("Keys sent to session '{name}'"))
    }
}

/// `send_commands`: paced token sequence with an optional trailing capture.
pub struct SendCommandsTool {
    pub context: ToolContext,
}

#[derive(Deserialize)]
struct CommandsArgs {
    session_name: String,
    commands: Vec<String>,
    default_delay_ms: Option<f64>,
    capture_screen: Option<bool>,
}

#[async_trait]
impl Tool for SendCommandsTool {
    fn name(&self) -> &'static str {
        "send_commands"
    }

    fn definition(&self) -> ToolDefinition {
        function_definition(
            self.name(),
            "Send a sequence of commands and keystrokes to a terminal session. Literals are typed as-is; <NAME> tokens are special keys or actions: <ENTER>, <ESC>, <TAB>, <BACKSPACE>, <DELETE>, <UP>, <DOWN>, <LEFT>, <RIGHT>, <HOME>, <END>, <PAGEUP>, <PAGEDOWN>, <SPACE>, <CTRL+X>, <ALT+X>, <SLEEP 500ms>, <SLEEP 2s>.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "session_name": {
                        "type": "string",
                        "description": "Name of the session."
                    },
                    "commands": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Array of commands to execute. Literals are typed as-is, <COMMAND> are special keys/actions."
                    },
                    "default_delay_ms": {
                        "type": "number",
                        "minimum": 0,
                        "description": "Delay between commands in milliseconds (default: 100)."
                    },
                    "capture_screen": {
                        "type": "boolean",
                        "description": "Whether to capture and return the screen content after execution (default: true)."
                    }
                },
                "required": ["session_name", "commands"]
            }),
        )
    }

    async fn execute(&self, arguments: &str) -> Result<String, ToolError> {
        let args: CommandsArgs = parse_args(arguments)?;
        let name = require_non_empty("session_name", &args.session_name)?;
        let options = SequenceOptions {
            inter_token_delay: resolve_delay(args.default_delay_ms, self.context.default_delay),
            capture_after: args.capture_screen.unwrap_or(true),
            strip_control_sequences: self.context.strip_ansi,
        };
        let report = send_commands(&self.context.driver, name, &args.commands, options)
            .await
            .map_err(|e| ToolError::failed("failed to send commands", e))?;
        Ok(report.to_string())
    }
}

/// Caller delay in whole milliseconds; negative or non-finite means none.
fn resolve_delay(requested_ms: Option<f64>, default: Duration) -> Duration {
    match requested_ms {
        Some(ms) if ms.is_finite() && ms > 0.0 => Duration::from_millis(ms as u64),
        Some(_) => Duration::ZERO,
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{tool_context, FakeHost, HostCall};
    use std::sync::Arc;

    #[tokio::test]
    async fn send_keys_passes_string_to_key_mode() {
        let host = Arc::new(FakeHost::new());
        host.set_screen("dev", "");
        let tool = SendKeysTool {
            context: tool_context(host.clone()),
        };
        let out = tool
            .execute(r#"{"session_name":"dev","keys":"C-c"}"#)
            .await
            .unwrap();
        assert_eq!(out, "Keys sent to session 'dev'");
        assert_eq!(
            host.calls(),
            vec![HostCall::Key {
                session: "dev".into(),
                key: "C-c".into()
            }]
        );
    }

    #[tokio::test]
    async fn send_keys_to_missing_session_fails() {
        let tool = SendKeysTool {
            context: tool_context(Arc::new(FakeHost::new())),
        };
        let err = tool
            .execute(r#"{"session_name":"ghost","keys":"Enter"}"#)
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("failed to send keys"), "got: {err}");
    }

    #[tokio::test]
    async fn send_commands_returns_report_with_screen() {
        let host = Arc::new(FakeHost::new());
        host.set_screen("dev", "$ echo hi\nhi\n");
        let tool = SendCommandsTool {
            context: tool_context(host),
        };
        let out = tool
            .execute(r#"{"session_name":"dev","commands":["echo hi","<ENTER>"],"default_delay_ms":0}"#)
            .await
            .unwrap();
        assert_eq!(
            out,
            "Executing 2 commands on session 'dev':\nCommands executed successfully.\n\nScreen content:\n$ echo hi\nhi\n"
        );
    }

    #[tokio::test]
    async fn send_commands_can_skip_capture() {
        let host = Arc::new(FakeHost::new());
        host.set_screen("dev", "");
        let tool = SendCommandsTool {
            context: tool_context(host.clone()),
        };
        let out = tool
            .execute(r#"{"session_name":"dev","commands":["x"],"capture_screen":false}"#)
            .await
            .unwrap();
        assert!(!out.contains("Screen content"), "got: {out}");
        assert!(!host
            .calls()
            .iter()
            .any(|call| matches!(call, HostCall::Capture { .. })));
    }

    #[tokio::test]
    async fn send_commands_failure_names_token() {
        let host = Arc::new(FakeHost::new());
        host.set_screen("dev", "");
        let tool = SendCommandsTool {
            context: tool_context(host),
        };
        let err = tool
            .execute(r#"{"session_name":"dev","commands":["a","<NOPE>"]}"#)
            .await
            .unwrap_err()
            .to_string();
        assert_eq!(
            err,
            "execution failed: failed to send commands: failed to execute command 2 ('<NOPE>'): unknown special command: <NOPE>"
        );
    }

    #[tokio::test]
    async fn send_commands_requires_command_list() {
        let tool = SendCommandsTool {
            context: tool_context(Arc::new(FakeHost::new())),
        };
        let err = tool
            .execute(r#"{"session_name":"dev"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)), "got: {err}");
    }

    #[test]
    fn delay_resolution_follows_caller_then_default() {
        let default = Duration::from_millis(100);
        assert_eq!(resolve_delay(None, default), default);
        assert_eq!(resolve_delay(Some(250.0), default), Duration::from_millis(250));
        assert_eq!(resolve_delay(Some(0.0), default), Duration::ZERO);
        assert_eq!(resolve_delay(Some(-5.0), default), Duration::ZERO);
        assert_eq!(resolve_delay(Some(f64::NAN), default), Duration::ZERO);
    }
}
