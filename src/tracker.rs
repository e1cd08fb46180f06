//! Multi-round interactive prompt tracking.
//!
//! An operation pairs an opaque id with a live session running a
//! line-oriented interactive program. The command line is suffixed with an
//! echo of its exit status behind a sentinel, and each response scans the
//! captured screen for it to move the operation out of `active`.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::driver::SessionDriver;
use crate::error::SessionError;
use crate::host::process::shell_quote;

/// Lifecycle of one interactive operation. `Finished` and `Error` are sticky.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Active,
    Finished,
    Error,
}

impl OperationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    pub session_name: String,
    /// Full command line as typed, sentinel suffix included.
    pub command: String,
    pub started_at: SystemTime,
    pub working_dir: Option<String>,
    pub status: OperationStatus,
}

/// Process-lifetime id -> record map.
///
/// Lookups share a read lock; inserts and transitions take the write lock.
#[derive(Debug, Default)]
pub struct OperationStore {
    records: RwLock<HashMap<String, OperationRecord>>,
    sequence: AtomicU64,
}

impl OperationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<prefix>-<unix-nanos>-<seq>`; unique within this store.
    pub fn next_id(&self, prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{nanos}-{seq}")
    }

    pub async fn insert(&self, id: String, record: OperationRecord) {
        self.records.write().await.insert(id, record);
    }

    pub async fn get(&self, id: &str) -> Option<OperationRecord> {
        self.records.read().await.get(id).cloned()
    }

    pub async fn status(&self, id: &str) -> Option<OperationStatus> {
        self.records.read().await.get(id).map(|record| record.status)
    }

    /// Move an active record to `next`. Terminal records keep their status.
    ///
    /// Returns the status held after the call.
    pub async fn transition(
        &self,
        id: &str,
        next: OperationStatus,
    ) -> Result<OperationStatus, SessionError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| SessionError::OperationNotFound(id.to_string()))?;
        if record.status == OperationStatus::Active && next != OperationStatus::Active {
            record.status = next;
            info!(operation = id, status = %next, "operation transitioned");
        }
        Ok(record.status)
    }

    /// All records ordered by start time.
    pub async fn snapshot(&self) -> Vec<(String, OperationRecord)> {
        let mut entries: Vec<_> = self
            .records
            .read()
            .await
            .iter()
            .map(|(id, record)| (id.clone(), record.clone()))
            .collect();
        entries.sort_by(|a, b| a.1.started_at.cmp(&b.1.started_at).then(a.0.cmp(&b.0)));
        entries
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Timing and protocol knobs for [`PromptTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOptions {
    pub start_settle: Duration,
    pub respond_settle: Duration,
    /// Marker echoed right before the exit status.
    pub sentinel: String,
    /// Host key that submits a line.
    pub execute_key: String,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            start_settle: Duration::from_millis(300),
            respond_settle: Duration::from_millis(200),
            sentinel: "EXIT_STATUS:".to_string(),
            execute_key: "Enter".to_string(),
        }
    }
}

/// Result of [`PromptTracker::start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedOperation {
    pub id: String,
    pub screen: String,
}

/// Result of [`PromptTracker::respond`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub screen: String,
    pub status: OperationStatus,
}

pub struct PromptTracker {
    driver: SessionDriver,
    store: Arc<OperationStore>,
    options: TrackerOptions,
}

impl PromptTracker {
    pub fn new(driver: SessionDriver, store: Arc<OperationStore>, options: TrackerOptions) -> Self {
        Self {
            driver,
            store,
            options,
        }
    }

    pub fn store(&self) -> &OperationStore {
        &self.store
    }

    /// Launch `base_command` (plus quoted `extra_args`) in a fresh session.
    ///
    /// The record is stored as soon as the session exists. If the command
    /// line cannot be typed, or the first screen cannot be read, the record
    /// is marked `error` before returning.
    pub async fn start(
        &self,
        prefix: &str,
        base_command: &str,
        working_dir: Option<&str>,
        extra_args: &[String],
    ) -> Result<StartedOperation, SessionError> {
        let id = self.store.next_id(prefix);
        let command = self.command_line(base_command, extra_args);

        self.driver.create(&id, None, working_dir).await?;
        self.store
            .insert(
                id.clone(),
                OperationRecord {
                    session_name: id.clone(),
                    command: command.clone(),
                    started_at: SystemTime::now(),
                    working_dir: working_dir.map(str::to_string),
                    status: OperationStatus::Active,
                },
            )
            .await;
        info!(operation = %id, command = %command, "operation started");

        if let Err(err) = self.submit(&id, &command).await {
            warn!(operation = %id, error = %err, "failed to launch operation command");
            self.store.transition(&id, OperationStatus::Error).await?;
            return Err(err);
        }

        pause(self.options.start_settle).await;
        match self.driver.capture(&id, true).await {
            Ok(screen) => Ok(StartedOperation { id, screen }),
            Err(err) => {
                warn!(operation = %id, error = %err, "failed to read operation screen");
                self.store.transition(&id, OperationStatus::Error).await?;
                Err(err)
            }
        }
    }

    /// Type `response` into an active operation and rescan for completion.
    pub async fn respond(&self, id: &str, response: &str) -> Result<Response, SessionError> {
        let record = self
            .store
            .get(id)
            .await
            .ok_or_else(|| SessionError::OperationNotFound(id.to_string()))?;
        if record.status != OperationStatus::Active {
            return Err(SessionError::InvalidState {
                id: id.to_string(),
                status: record.status.to_string(),
            });
        }

        self.submit(&record.session_name, response).await?;
        pause(self.options.respond_settle).await;
        let screen = self.driver.capture(&record.session_name, true).await?;

        let status = match parse_exit_sentinel(&screen, &self.options.sentinel) {
            Some(0) => self.store.transition(id, OperationStatus::Finished).await?,
            Some(code) => {
                debug!(operation = id, code, "operation exited with failure");
                self.store.transition(id, OperationStatus::Error).await?
            }
            None => OperationStatus::Active,
        };
        Ok(Response { screen, status })
    }

    pub async fn status(&self, id: &str) -> Result<OperationRecord, SessionError> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| SessionError::OperationNotFound(id.to_string()))
    }

    fn command_line(&self, base_command: &str, extra_args: &[String]) -> String {
        let mut command = base_command.trim().to_string();
        for arg in extra_args {
            command.push(' ');
            command.push_str(&shell_quote(arg));
        }
        format!("{command}; echo \"{}$?\"", self.options.sentinel)
    }

    async fn submit(&self, session: &str, text: &str) -> Result<(), SessionError> {
        self.driver.inject_literal(session, text).await?;
        self.driver
            .inject_key(session, &self.options.execute_key)
            .await
    }
}

/// Exit status echoed after the last `sentinel` that is followed by digits.
///
/// The echoed command line (`<sentinel>$?`) never matches.
pub fn parse_exit_sentinel(screen: &str, sentinel: &str) -> Option<i32> {
    if sentinel.is_empty() {
        return None;
    }
    screen
        .match_indices(sentinel)
        .filter_map(|(start, _)| {
            let rest = &screen[start + sentinel.len()..];
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<i32>().ok()
        })
        .last()
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverOptions;
    use crate::testsupport::{FakeHost, HostCall};

    fn tracker(host: Arc<FakeHost>) -> PromptTracker {
        let driver = SessionDriver::new(
            host,
            DriverOptions {
                settle: Duration::ZERO,
                ..DriverOptions::default()
            },
        );
        PromptTracker::new(
            driver,
            Arc::new(OperationStore::new()),
            TrackerOptions {
                start_settle: Duration::ZERO,
                respond_settle: Duration::ZERO,
                ..TrackerOptions::default()
            },
        )
    }

    #[test]
    fn sentinel_requires_digits_and_last_match_wins() {
        let echoed = "$ git add -p; echo \"EXIT_STATUS:$?\"\n";
        assert_eq!(parse_exit_sentinel(echoed, "EXIT_STATUS:"), None);
        assert_eq!(
            parse_exit_sentinel(&format!("{echoed}EXIT_STATUS:0\n$ "), "EXIT_STATUS:"),
            Some(0)
        );
        assert_eq!(
            parse_exit_sentinel("EXIT_STATUS:0\nEXIT_STATUS:128\n", "EXIT_STATUS:"),
            Some(128)
        );
        assert_eq!(parse_exit_sentinel("EXIT_STATUS:1", ""), None);
    }

    #[test]
    fn ids_are_prefixed_and_unique() {
        let store = OperationStore::new();
        let a = store.next_id("git-add-patch");
        let b = store.next_id("git-add-patch");
        assert!(a.starts_with("git-add-patch-"), "got: {a}");
        assert!(a.ends_with("-1") && b.ends_with("-2"), "got: {a} {b}");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn start_types_quoted_command_with_sentinel() {
        let host = Arc::new(FakeHost::new());
        host.push_capture("Stage this hunk [y,n,q,a,d,?]? ");
        let tracker = tracker(host.clone());

        let started = tracker
            .start(
                "git-add-patch",
                "git add -p",
                Some("/repo"),
                &["src/it's.rs".to_string()],
            )
            .await
            .expect("start");
        assert_eq!(started.screen, "Stage this hunk [y,n,q,a,d,?]? ");

        let record = tracker.status(&started.id).await.expect("record");
        assert_eq!(record.status, OperationStatus::Active);
        assert_eq!(record.working_dir.as_deref(), Some("/repo"));
        assert_eq!(
            record.command,
            "git add -p 'src/it'\\''s.rs'; echo \"EXIT_STATUS:$?\""
        );

        let calls = host.calls();
        assert!(matches!(&calls[0], HostCall::NewSession(request) if request.name == started.id));
        assert_eq!(
            calls[1],
            HostCall::Literal {
                session: started.id.clone(),
                text: record.command.clone()
            }
        );
        assert_eq!(
            calls[2],
            HostCall::Key {
                session: started.id.clone(),
                key: "Enter".into()
            }
        );
    }

    #[tokio::test]
    async fn respond_finishes_on_zero_exit_then_rejects() {
        let host = Arc::new(FakeHost::new());
        host.push_capture("$ git add -p; echo \"EXIT_STATUS:$?\"\nStage this hunk? ");
        host.push_capture("$ git add -p; echo \"EXIT_STATUS:$?\"\nStage this hunk? y\n");
        host.push_capture("Stage this hunk? q\nEXIT_STATUS:0\n$ ");
        let tracker = tracker(host.clone());

        let started = tracker
            .start("git-add-patch", "git add -p", None, &[])
            .await
            .expect("start");

        let first = tracker.respond(&started.id, "y").await.expect("respond y");
        assert_eq!(first.status, OperationStatus::Active);

        let second = tracker.respond(&started.id, "q").await.expect("respond q");
        assert_eq!(second.status, OperationStatus::Finished);
        assert!(second.screen.contains("EXIT_STATUS:0"));

        let err = tracker
            .respond(&started.id, "y")
            .await
            .expect_err("finished is sticky");
        assert!(
            matches!(&err, SessionError::InvalidState { status, .. } if status == "finished"),
            "got: {err}"
        );
    }

    #[tokio::test]
    async fn nonzero_exit_moves_to_error() {
        let host = Arc::new(FakeHost::new());
        host.push_capture("prompt");
        host.push_capture("fatal: not a git repository\nEXIT_STATUS:128\n");
        let tracker = tracker(host);

        let started = tracker
            .start("git-add-patch", "git add -p", None, &[])
            .await
            .expect("start");
        let response = tracker.respond(&started.id, "y").await.expect("respond");
        assert_eq!(response.status, OperationStatus::Error);
        assert_eq!(
            tracker.store().status(&started.id).await,
            Some(OperationStatus::Error)
        );
    }

    #[tokio::test]
    async fn respond_to_unknown_id_is_not_found() {
        let tracker = tracker(Arc::new(FakeHost::new()));
        let err = tracker.respond("nope", "y").await.expect_err("unknown");
        assert!(matches!(err, SessionError::OperationNotFound(_)), "got: {err}");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn failed_launch_marks_record_error() {
        let host = Arc::new(FakeHost::new());
        host.fail_key("Enter");
        let tracker = tracker(host);

        let err = tracker
            .start("git-add-patch", "git add -p", None, &[])
            .await
            .expect_err("enter rejected");
        assert!(matches!(err, SessionError::InjectFailed(_)), "got: {err}");
        let records = tracker.store().snapshot().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1.status, OperationStatus::Error);
    }

    #[tokio::test]
    async fn unreadable_first_screen_marks_record_error() {
        let host = Arc::new(FakeHost::new());
        host.fail_captures();
        let tracker = tracker(host);

        let err = tracker
            .start("git-add-patch", "git add -p", None, &[])
            .await
            .expect_err("capture rejected");
        assert!(matches!(err, SessionError::CaptureFailed(_)), "got: {err}");
        let records = tracker.store().snapshot().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].1.status, OperationStatus::Error);
    }

    #[tokio::test]
    async fn terminal_status_is_sticky_in_store() {
        let store = OperationStore::new();
        store
            .insert(
                "op".into(),
                OperationRecord {
                    session_name: "op".into(),
                    command: "true".into(),
                    started_at: SystemTime::now(),
                    working_dir: None,
                    status: OperationStatus::Active,
                },
            )
            .await;
        assert_eq!(
            store
                .transition("op", OperationStatus::Error)
                .await
                .expect("transition"),
            OperationStatus::Error
        );
        assert_eq!(
            store
                .transition("op", OperationStatus::Finished)
                .await
                .expect("transition"),
            OperationStatus::Error
        );
        assert!(store
            .transition("missing", OperationStatus::Finished)
            .await
            .is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_keep_every_record() {
        let host = Arc::new(FakeHost::new());
        let tracker = Arc::new(tracker(host.clone()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let tracker = tracker.clone();
                tokio::spawn(async move {
                    tracker
                        .start("git-add-patch", "git add -p", None, &[])
                        .await
                        .expect("start")
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.expect("join"));
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(tracker.store().len().await, 16);
        assert_eq!(host.session_names().len(), 16);
    }
}
