// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Harvest run-state and its transition table.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle phase of a repository's harvest job.
///
/// A repository with no observed run-state is [`RunState::Waiting`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    #[default]
    Waiting,
    Running,
    Stopping,
    Error,
}

crate::simple_display! {
    RunState {
        Waiting => "WAITING",
        Running => "RUNNING",
        Stopping => "STOPPING",
        Error => "ERROR",
    }
}

impl RunState {
    pub const ALL: [RunState; 4] =
        [RunState::Waiting, RunState::Running, RunState::Stopping, RunState::Error];

    /// Whether `self -> next` is in the transition table.
    ///
    /// `reset_requested` is true when an explicit reset was issued for the
    /// repository; it is the only way out of `Error` that counts as expected.
    /// Same-state updates are not transitions and are always expected.
    pub fn is_expected_transition(self, next: RunState, reset_requested: bool) -> bool {
        use RunState::*;
        match (self, next) {
            (a, b) if a == b => true,
            (_, Error) => true,
            (Waiting, Running) | (Running, Stopping) | (Stopping, Waiting) => true,
            (Error, Waiting) => reset_requested,
            _ => false,
        }
    }

    /// Whether the repository's harvest is idle, so enable/disable is allowed.
    pub fn is_idle(self) -> bool {
        self == RunState::Waiting
    }
}

/// Error for a run-state label outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown run state: {0:?}")]
pub struct UnknownRunState(pub String);

impl FromStr for RunState {
    type Err = UnknownRunState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WAITING" => Ok(RunState::Waiting),
            "RUNNING" => Ok(RunState::Running),
            "STOPPING" => Ok(RunState::Stopping),
            "ERROR" => Ok(RunState::Error),
            _ => Err(UnknownRunState(s.to_string())),
        }
    }
}

/// A run-state change the transition table does not allow.
///
/// Applied anyway (the backend is authoritative) and kept on the snapshot
/// until an expected transition clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("unexpected run-state transition {from} -> {to}")]
pub struct UnexpectedTransition {
    pub from: RunState,
    pub to: RunState,
}

#[cfg(test)]
#[path = "run_state_tests.rs"]
mod tests;
