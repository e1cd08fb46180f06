//! Shared test fixtures for driver/sequencer/tracker test modules.
//!
//! [`FakeHost`] is an in-memory [`TerminalHost`] that records every call and
//! serves scripted screens, so core behavior can be tested without tmux.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::driver::{DriverOptions, SessionDriver};
use crate::error::SessionError;
use crate::host::{NewSession, TerminalHost};
use crate::tools::ToolContext;
use crate::tracker::{OperationStore, PromptTracker, TrackerOptions};

/// Tool context over `host` with every settle and pacing delay disabled.
pub fn tool_context(host: Arc<FakeHost>) -> ToolContext {
    let driver = SessionDriver::new(
        host,
        DriverOptions {
            settle: Duration::ZERO,
            ..DriverOptions::default()
        },
    );
    let tracker = PromptTracker::new(
        driver.clone(),
        Arc::new(OperationStore::new()),
        TrackerOptions {
            start_settle: Duration::ZERO,
            respond_settle: Duration::ZERO,
            ..TrackerOptions::default()
        },
    );
    ToolContext {
        driver,
        tracker: Arc::new(tracker),
        default_delay: Duration::ZERO,
        strip_ansi: true,
        git_add_patch_command: "git add -p".to_string(),
    }
}

/// One recorded host invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    NewSession(NewSession),
    Literal { session: String, text: String },
    Key { session: String, key: String },
    Capture { session: String },
    HasSession(String),
    List,
    Linked { new_name: String, target: String },
    Kill(String),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<(Instant, HostCall)>,
    sessions: BTreeSet<String>,
    screens: HashMap<String, String>,
    queued_screens: VecDeque<String>,
    failing_keys: HashSet<String>,
    failing_literals: HashSet<String>,
    captures_fail: bool,
}

/// Scripted, call-recording terminal host.
///
/// Sessions live in a set and every lookup is an exact name match, the same
/// resolution `TmuxHost` gets from its `=NAME` targets.
#[derive(Default)]
pub struct FakeHost {
    state: Mutex<FakeState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing session with a fixed screen.
    pub fn set_screen(&self, session: &str, screen: &str) {
        let mut state = self.state.lock().unwrap();
        state.sessions.insert(session.to_string());
        state
            .screens
            .insert(session.to_string(), screen.to_string());
    }

    /// Queue a screen returned by the next capture of any live session.
    pub fn push_capture(&self, screen: &str) {
        self.state
            .lock()
            .unwrap()
            .queued_screens
            .push_back(screen.to_string());
    }

    pub fn fail_key(&self, key: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_keys
            .insert(key.to_string());
    }

    pub fn fail_literal(&self, text: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_literals
            .insert(text.to_string());
    }

    pub fn fail_captures(&self) {
        self.state.lock().unwrap().captures_fail = true;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, HostCall)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn session_names(&self) -> Vec<String> {
        self.state.lock().unwrap().sessions.iter().cloned().collect()
    }

    fn record(&self, call: HostCall) {
        self.state
            .lock()
            .unwrap()
            .calls
            .push((Instant::now(), call));
    }

    fn exists(&self, session: &str) -> bool {
        self.state.lock().unwrap().sessions.contains(session)
    }
}

#[async_trait]
impl TerminalHost for FakeHost {
    async fn new_session(&self, request: &NewSession) -> Result<(), SessionError> {
        self.record(HostCall::NewSession(request.clone()));
        let mut state = self.state.lock().unwrap();
        if !state.sessions.insert(request.name.clone()) {
            return Err(SessionError::CreateFailed(format!(
                "duplicate session: {}",
                request.name
            )));
        }
        Ok(())
    }

    async fn send_literal(&self, session: &str, text: &str) -> Result<(), SessionError> {
        self.record(HostCall::Literal {
            session: session.to_string(),
            text: text.to_string(),
        });
        if !self.exists(session) {
            return Err(SessionError::InjectFailed(format!(
                "can't find pane: {session}"
            )));
        }
        if self.state.lock().unwrap().failing_literals.contains(text) {
            return Err(SessionError::InjectFailed(format!("rejected text {text}")));
        }
        Ok(())
    }

    async fn send_key(&self, session: &str, key: &str) -> Result<(), SessionError> {
        self.record(HostCall::Key {
            session: session.to_string(),
            key: key.to_string(),
        });
        if !self.exists(session) {
            return Err(SessionError::InjectFailed(format!(
                "can't find pane: {session}"
            )));
        }
        if self.state.lock().unwrap().failing_keys.contains(key) {
            return Err(SessionError::InjectFailed(format!("unknown key: {key}")));
        }
        Ok(())
    }

    async fn capture(&self, session: &str, _with_escapes: bool) -> Result<String, SessionError> {
        self.record(HostCall::Capture {
            session: session.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        if state.captures_fail || !state.sessions.contains(session) {
            return Err(SessionError::CaptureFailed(format!(
                "can't find pane: {session}"
            )));
        }
        if let Some(screen) = state.queued_screens.pop_front() {
            return Ok(screen);
        }
        Ok(state.screens.get(session).cloned().unwrap_or_default())
    }

    async fn has_session(&self, session: &str) -> Result<bool, SessionError> {
        self.record(HostCall::HasSession(session.to_string()));
        Ok(self.exists(session))
    }

    async fn list_sessions(&self) -> Result<String, SessionError> {
        self.record(HostCall::List);
        let state = self.state.lock().unwrap();
        Ok(state
            .sessions
            .iter()
            .map(|name| format!("{name}: 1 windows (created today)\n"))
            .collect())
    }

    async fn new_linked_session(&self, new_name: &str, target: &str) -> Result<(), SessionError> {
        self.record(HostCall::Linked {
            new_name: new_name.to_string(),
            target: target.to_string(),
        });
        let mut state = self.state.lock().unwrap();
        if !state.sessions.contains(target) {
            return Err(SessionError::CreateFailed(format!(
                "can't find session: {target}"
            )));
        }
        if !state.sessions.insert(new_name.to_string()) {
            return Err(SessionError::CreateFailed(format!(
                "duplicate session: {new_name}"
            )));
        }
        Ok(())
    }

    async fn kill_session(&self, session: &str) -> Result<(), SessionError> {
        self.record(HostCall::Kill(session.to_string()));
        let mut state = self.state.lock().unwrap();
        if !state.sessions.remove(session) {
            return Err(SessionError::SessionNotFound(session.to_string()));
        }
        state.screens.remove(session);
        Ok(())
    }
}
