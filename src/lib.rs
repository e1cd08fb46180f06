//! ttypilot: drive tmux sessions on behalf of an agent.
//!
//! The crate starts and tears down named terminal sessions, types into them
//! (literal text, named keys, modifier chords, pauses), captures their
//! screens with optional SGR stripping, and tracks long-running interactive
//! prompts such as `git add -p` until they report an exit status.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ttypilot::driver::{DriverOptions, SessionDriver};
//! use ttypilot::host::TmuxHost;
//! use ttypilot::sequencer::{send_commands, SequenceOptions};
//!
//! # async fn example() -> Result<(), ttypilot::error::SessionError> {
//! let host = TmuxHost::detect("tmux").await?;
//! let driver = SessionDriver::new(Arc::new(host), DriverOptions::default());
//! driver.create("work", None, None).await?;
//! let tokens = vec!["echo hi".to_string(), "<ENTER>".to_string()];
//! let report = send_commands(&driver, "work", &tokens, SequenceOptions::default()).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod build_info;
pub mod capture;
pub mod config;
pub mod driver;
pub mod error;
pub mod host;
pub mod keys;
pub mod render;
pub mod sequencer;
#[cfg(test)]
pub mod testsupport;
pub mod tools;
pub mod tracker;
pub mod types;
