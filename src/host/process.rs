//! Process execution helpers shared by host implementations.

use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::SessionError;

/// Structured process output for one host invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Most useful failure text: stderr, else stdout, else the exit code.
    pub fn failure_details(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("command exited with {}", self.exit_code)
    }
}

/// Spawn a program directly (no shell) and wait for it to exit.
///
/// A spawn failure is reported through `on_spawn_error` so each caller can
/// choose the error class it belongs to.
pub async fn run_process(
    program: &str,
    args: &[String],
    on_spawn_error: impl FnOnce(String) -> SessionError,
) -> Result<ExecOutput, SessionError> {
    debug!(program, ?args, "running host command");
    let mut cmd = Command::new(program);
    // Dropped futures must not leave orphaned host processes behind.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = match cmd.output().await {
        Ok(output) => output,
        Err(e) => return Err(on_spawn_error(format!("{program}: {e}"))),
    };

    Ok(ExecOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert non-zero exit status into a contextual error.
pub fn ensure_success(
    output: ExecOutput,
    wrap: impl FnOnce(String) -> SessionError,
) -> Result<ExecOutput, SessionError> {
    if output.success() {
        Ok(output)
    } else {
        Err(wrap(output.failure_details()))
    }
}

/// Probe `<program> <version_flag>`; `Ok(None)` means the binary is absent.
pub async fn probe_version(
    program: &str,
    version_flag: &str,
) -> Result<Option<String>, SessionError> {
    let output = match Command::new(program).arg(version_flag).output().await {
        Ok(out) => out,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SessionError::HostUnavailable(format!(
                "failed to probe {program}: {e}"
            )))
        }
    };
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Some(stdout.trim().to_string()))
}

/// Shell-safe single-quote escaping.
pub fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".into()
    } else {
        format!("'{}'", s.replace('\'', "'\\''"))
    }
}
