//! Agent lifecycle flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable lifecycle state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Running,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Running => "running",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// `initialized` only ever goes from false to true; `running` toggles.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    initialized: bool,
    running: bool,
    started_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        match (self.initialized, self.running, self.started_at) {
            (_, true, _) => LifecycleState::Running,
            (false, _, _) => LifecycleState::Uninitialized,
            (true, false, Some(_)) => LifecycleState::Stopped,
            (true, false, None) => LifecycleState::Initialized,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time of the most recent start; kept across a stop.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns `false` if already initialized.
    pub(crate) fn mark_initialized(&mut self) -> bool {
        !std::mem::replace(&mut self.initialized, true)
    }

    /// Returns `false` if not initialized or already running.
    pub(crate) fn start(&mut self) -> bool {
        if !self.initialized || self.running {
            return false;
        }
        self.running = true;
        self.started_at = Some(Utc::now());
        true
    }

    /// Returns `false` if not running.
    pub(crate) fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }
}
