//! `tmux` implementation of [`TerminalHost`].
//!
//! Each operation is one `tmux` invocation with an explicit argument vector;
//! nothing is routed through a shell, so session names and literal text reach
//! tmux byte-for-byte.

use async_trait::async_trait;
use tracing::{debug, info};

use super::process::{ensure_success, probe_version, run_process};
use super::{NewSession, TerminalHost};
use crate::error::SessionError;

/// Host stderr fragments meaning "that session is not there".
const NOT_FOUND_MARKERS: [&str; 4] = [
    "can't find session",
    "session not found",
    "no server running",
    "error connecting to",
];

/// Host backed by a local `tmux` binary.
#[derive(Debug, Clone)]
pub struct TmuxHost {
    binary: String,
}

impl TmuxHost {
    /// Verify the binary is runnable, then build the host.
    ///
    /// This is the single eager availability check; per-call spawn failures
    /// after this point are reported in their own error class.
    pub async fn detect(binary: &str) -> Result<Self, SessionError> {
        match probe_version(binary, "-V").await? {
            Some(version) => {
                info!(binary, version = %version, "terminal host available");
                Ok(Self {
                    binary: binary.to_string(),
                })
            }
            None => Err(SessionError::HostUnavailable(format!(
                "{binary} is required but not found in PATH. Please install tmux: brew install tmux (macOS) or apt-get install tmux (Ubuntu)"
            ))),
        }
    }

    /// Build without probing (for callers that already verified the binary).
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn run(
        &self,
        args: Vec<String>,
        on_spawn_error: impl FnOnce(String) -> SessionError,
    ) -> Result<super::process::ExecOutput, SessionError> {
        run_process(&self.binary, &args, on_spawn_error).await
    }
}

#[async_trait]
impl TerminalHost for TmuxHost {
    async fn new_session(&self, request: &NewSession) -> Result<(), SessionError> {
        let output = self
            .run(new_session_args(request), SessionError::CreateFailed)
            .await?;
        ensure_success(output, SessionError::CreateFailed)?;
        Ok(())
    }

    async fn send_literal(&self, session: &str, text: &str) -> Result<(), SessionError> {
        let output = self
            .run(send_literal_args(session, text), SessionError::InjectFailed)
            .await?;
        ensure_success(output, |details| {
            SessionError::InjectFailed(format!("literal text to '{session}': {details}"))
        })?;
        Ok(())
    }

    async fn send_key(&self, session: &str, key: &str) -> Result<(), SessionError> {
        let output = self
            .run(send_key_args(session, key), SessionError::InjectFailed)
            .await?;
        ensure_success(output, |details| {
            SessionError::InjectFailed(format!("key '{key}' to '{session}': {details}"))
        })?;
        Ok(())
    }

    async fn capture(&self, session: &str, with_escapes: bool) -> Result<String, SessionError> {
        let output = self
            .run(
                capture_args(session, with_escapes),
                SessionError::CaptureFailed,
            )
            .await?;
        ensure_success(output, SessionError::CaptureFailed).map(|out| out.stdout)
    }

    async fn has_session(&self, session: &str) -> Result<bool, SessionError> {
        let output = self
            .run(has_session_args(session), SessionError::HostFailed)
            .await?;
        debug!(session, exists = output.success(), "probed session");
        Ok(output.success())
    }

    async fn list_sessions(&self) -> Result<String, SessionError> {
        let output = self
            .run(vec!["list-sessions".to_string()], SessionError::HostFailed)
            .await?;
        if !output.success() && is_no_server(&output.stderr) {
            return Ok(String::new());
        }
        ensure_success(output, |details| {
            SessionError::HostFailed(format!("failed to list sessions: {details}"))
        })
        .map(|out| out.stdout)
    }

    async fn new_linked_session(&self, new_name: &str, target: &str) -> Result<(), SessionError> {
        let output = self
            .run(
                linked_session_args(new_name, target),
                SessionError::CreateFailed,
            )
            .await?;
        ensure_success(output, |details| {
            SessionError::CreateFailed(format!("failed to create shared session: {details}"))
        })?;
        Ok(())
    }

    async fn kill_session(&self, session: &str) -> Result<(), SessionError> {
        let output = self
            .run(kill_session_args(session), SessionError::HostFailed)
            .await?;
        if !output.success() && is_not_found(&output.stderr) {
            return Err(SessionError::SessionNotFound(session.to_string()));
        }
        ensure_success(output, SessionError::HostFailed)?;
        Ok(())
    }
}

pub(crate) fn new_session_args(request: &NewSession) -> Vec<String> {
    let mut args = vec![
        "new-session".to_string(),
        "-d".to_string(),
        "-s".to_string(),
        request.name.clone(),
        "-x".to_string(),
        request.width.to_string(),
        "-y".to_string(),
        request.height.to_string(),
    ];
    if let Some(dir) = request.working_dir.as_deref() {
        args.push("-c".to_string());
        args.push(dir.to_string());
    }
    if let Some(command) = request.command.as_deref() {
        args.push(command.to_string());
    }
    args
}

/// Exact-match session target. A bare name would also resolve to any
/// session it is a prefix of.
pub(crate) fn session_target(session: &str) -> String {
    format!("={session}")
}

/// Exact-match target for the active pane of `session`.
pub(crate) fn pane_target(session: &str) -> String {
    format!("={session}:")
}

pub(crate) fn send_literal_args(session: &str, text: &str) -> Vec<String> {
    vec![
        "send-keys".to_string(),
        "-l".to_string(),
        "-t".to_string(),
        pane_target(session),
        // `--` keeps text starting with '-' from being read as a flag.
        "--".to_string(),
        text.to_string(),
    ]
}

pub(crate) fn send_key_args(session: &str, key: &str) -> Vec<String> {
    vec![
        "send-keys".to_string(),
        "-t".to_string(),
        pane_target(session),
        key.to_string(),
    ]
}

pub(crate) fn capture_args(session: &str, with_escapes: bool) -> Vec<String> {
    let mut args = vec!["capture-pane".to_string(), "-p".to_string()];
    if with_escapes {
        args.push("-e".to_string());
    }
    args.push("-t".to_string());
    args.push(pane_target(session));
    args
}

pub(crate) fn has_session_args(session: &str) -> Vec<String> {
    vec![
        "has-session".to_string(),
        "-t".to_string(),
        session_target(session),
    ]
}

pub(crate) fn linked_session_args(new_name: &str, target: &str) -> Vec<String> {
    vec![
        "new-session".to_string(),
        "-d".to_string(),
        "-s".to_string(),
        new_name.to_string(),
        "-t".to_string(),
        session_target(target),
    ]
}

pub(crate) fn kill_session_args(session: &str) -> Vec<String> {
    vec![
        "kill-session".to_string(),
        "-t".to_string(),
        session_target(session),
    ]
}

fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    NOT_FOUND_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn is_no_server(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("no server running") || lower.contains("error connecting to")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_args_include_geometry_and_optionals() {
        let args = new_session_args(&NewSession {
            name: "dev".into(),
            width: 80,
            height: 24,
            working_dir: Some("/tmp/work".into()),
            command: Some("vim notes.txt".into()),
        });
        assert_eq!(
            args,
            [
                "new-session",
                "-d",
                "-s",
                "dev",
                "-x",
                "80",
                "-y",
                "24",
                "-c",
                "/tmp/work",
                "vim notes.txt"
            ]
        );
    }

    #[test]
    fn new_session_args_omit_unset_optionals() {
        let args = new_session_args(&NewSession {
            name: "dev".into(),
            width: 80,
            height: 24,
            working_dir: None,
            command: None,
        });
        assert_eq!(args.len(), 8);
        assert!(!args.contains(&"-c".to_string()));
    }

    #[test]
    fn literal_args_use_literal_mode_and_end_of_flags() {
        let args = send_literal_args("dev", "-n <ENTER>");
        assert_eq!(args, ["send-keys", "-l", "-t", "=dev:", "--", "-n <ENTER>"]);
    }

    #[test]
    fn key_args_pass_key_name_through() {
        assert_eq!(
            send_key_args("dev", "C-c"),
            ["send-keys", "-t", "=dev:", "C-c"]
        );
    }

    #[test]
    fn capture_args_toggle_escape_flag() {
        assert_eq!(
            capture_args("dev", true),
            ["capture-pane", "-p", "-e", "-t", "=dev:"]
        );
        assert_eq!(
            capture_args("dev", false),
            ["capture-pane", "-p", "-t", "=dev:"]
        );
    }

    #[test]
    fn linked_session_args_target_group() {
        assert_eq!(
            linked_session_args("viewer", "dev"),
            ["new-session", "-d", "-s", "viewer", "-t", "=dev"]
        );
    }

    #[test]
    fn session_lookups_use_exact_match_targets() {
        assert_eq!(has_session_args("dev"), ["has-session", "-t", "=dev"]);
        assert_eq!(kill_session_args("dev"), ["kill-session", "-t", "=dev"]);
        assert_eq!(session_target("dev-view"), "=dev-view");
        assert_eq!(pane_target("dev"), "=dev:");
    }

    #[test]
    fn not_found_markers_match_tmux_messages() {
        assert!(is_not_found("can't find session: dev\n"));
        assert!(is_not_found("no server running on /tmp/tmux-0/default\n"));
        assert!(!is_not_found("protocol version mismatch"));
        assert!(is_no_server("no server running on /tmp/tmux-1000/default"));
        assert!(!is_no_server("can't find session: dev"));
    }

    #[tokio::test]
    async fn detect_reports_missing_binary_as_host_unavailable() {
        let err = TmuxHost::detect("ttypilot-no-such-tmux")
            .await
            .expect_err("binary is missing");
        assert!(matches!(err, SessionError::HostUnavailable(_)), "got: {err}");
    }
}
