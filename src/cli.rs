//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

/// Drive tmux sessions: start them, type into them, read their screens.
#[derive(Debug, Parser)]
#[command(
    name = "ttypilot",
    disable_version_flag = true,
    after_help = ttypilot::build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Path to config file (default: ./ttypilot.toml or ~/.config/ttypilot/ttypilot.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Print version and build metadata.
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Start a new detached session.
    StartSession {
        name: String,
        /// Program to run instead of a shell.
        #[arg(long)]
        command: Option<String>,
        /// Working directory for the session.
        #[arg(long = "dir")]
        working_directory: Option<String>,
    },
    /// Send tmux key names (for example `C-c`, `Enter`) to a session.
    SendKeys { name: String, keys: String },
    /// Send literal text and <KEY> tokens in order.
    SendCommands {
        name: String,
        /// Tokens: literal text, or <ENTER>, <CTRL+C>, <SLEEP 500ms>, ...
        #[arg(required = true, allow_hyphen_values = true)]
        commands: Vec<String>,
        /// Delay between tokens in milliseconds.
        #[arg(long = "delay-ms")]
        delay_ms: Option<u64>,
        /// Skip the trailing screen capture.
        #[arg(long = "no-capture")]
        no_capture: bool,
    },
    /// Print the current screen of a session.
    View {
        name: String,
        /// Keep ANSI color/attribute sequences.
        #[arg(long)]
        raw: bool,
    },
    /// List live sessions.
    List,
    /// Attach to an existing session, optionally under a second name.
    Join {
        name: String,
        #[arg(long = "as")]
        new_name: Option<String>,
    },
    /// Close a session.
    Close { name: String },
    /// Start interactive `git add -p` staging.
    GitAddPatch {
        #[arg(long = "dir")]
        working_directory: Option<String>,
        /// Extra arguments for git add -p (paths, globs).
        args: Vec<String>,
    },
    /// Print the tool catalogue as JSON.
    Tools,
    /// Invoke a tool by name with a JSON arguments object.
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        arguments: String,
    },
    /// Read `{"tool": ..., "arguments": {...}}` lines from stdin.
    Batch,
    /// Write the default config to ~/.config/ttypilot/ttypilot.toml.
    Init {
        /// Back up and overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Command {
    /// Tool name and JSON arguments for subcommands that map to one tool call.
    pub fn tool_call(&self) -> Option<(String, Value)> {
        let call = match self {
            Self::StartSession {
                name,
                command,
                working_directory,
            } => (
                "start_session",
                json!({
                    "session_name": name,
                    "command": command,
                    "working_directory": working_directory,
                }),
            ),
            Self::SendKeys { name, keys } => {
                ("send_keys", json!({ "session_name": name, "keys": keys }))
            }
            Self::SendCommands {
                name,
                commands,
                delay_ms,
                no_capture,
            } => (
                "send_commands",
                json!({
                    "session_name": name,
                    "commands": commands,
                    "default_delay_ms": delay_ms,
                    "capture_screen": !no_capture,
                }),
            ),
            Self::View { name, raw } => ("view_session", json!({ "session_name": name, "raw": raw })),
            Self::List => ("list_sessions", json!({})),
            Self::Join { name, new_name } => (
                "join_session",
                json!({ "session_name": name, "new_session_name": new_name }),
            ),
            Self::Close { name } => ("close_session", json!({ "session_name": name })),
            Self::GitAddPatch {
                working_directory,
                args,
            } => (
                "git_add_patch",
                json!({ "working_directory": working_directory, "args": args }),
            ),
            Self::Call { tool, arguments } => {
                let value = serde_json::from_str(arguments)
                    .unwrap_or_else(|_| Value::String(arguments.clone()));
                return Some((tool.clone(), value));
            }
            Self::Tools | Self::Batch | Self::Init { .. } => return None,
        };
        Some((call.0.to_string(), call.1))
    }
}
