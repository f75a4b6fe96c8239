// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command and poll-failure handlers.

use hc_core::{Intent, RunState};

use super::StatusState;

pub(crate) fn apply(state: &mut StatusState, intent: &Intent) {
    match intent {
        Intent::Command { command } => {
            let Some(id) = command.repository_id() else {
                return;
            };
            let Some(snapshot) = state.snapshot_mut(id) else {
                return;
            };
            snapshot.command_failure = None;
            if command.is_reset() && snapshot.run_state == RunState::Error {
                snapshot.reset_pending = true;
            }
        }

        Intent::CommandFailed { failure } => {
            state.metrics.command_failures += 1;
            tracing::warn!(command = %failure.command, error = %failure.error, "command failed");
            let Some(id) = failure.command.repository_id() else {
                return;
            };
            let Some(snapshot) = state.snapshot_mut(id) else {
                return;
            };
            // Run-state stays at its last known value.
            if failure.command.is_reset() {
                snapshot.reset_pending = false;
            }
            snapshot.command_failure = Some(failure.clone());
        }

        Intent::PollFailed { repository_id, error } => {
            state.metrics.poll_failures += 1;
            tracing::warn!(repository = %repository_id, %error, "poll failed, keeping last snapshot");
            if let Some(snapshot) = state.snapshot_mut(repository_id) {
                snapshot.poll_error = Some(error.clone());
            }
        }

        _ => {}
    }
}
