// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_core::{CommandFailure, UserCommand};

fn bulk_reset(id: &str) -> Intent {
    Intent::Command { command: UserCommand::BulkReset { repository_id: id.into() } }
}

#[test]
fn reset_then_waiting_push_returns_to_waiting_unflagged() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 1)));
    state.apply_intent(&status(error_event("1", "oai down", 2)));
    assert_eq!(state.snapshot(&"1".into()).unwrap().run_state, RunState::Error);

    state.apply_intent(&bulk_reset("1"));
    assert!(state.snapshot(&"1".into()).unwrap().reset_pending);

    state.apply_intent(&status(run_state_event("1", RunState::Waiting, 3)));
    let snapshot = state.snapshot(&"1".into()).unwrap();
    assert_eq!(snapshot.run_state, RunState::Waiting);
    assert!(snapshot.unexpected.is_none());
    assert!(!snapshot.reset_pending);
    assert!(snapshot.last_error.is_none());
    assert_eq!(state.metrics.unexpected_transitions, 0);
}

#[test]
fn waiting_after_error_without_reset_is_flagged() {
    let mut state = StatusState::new();
    state.apply_intent(&status(error_event("1", "oai down", 1)));
    state.apply_intent(&status(run_state_event("1", RunState::Waiting, 2)));

    let snapshot = state.snapshot(&"1".into()).unwrap();
    assert_eq!(snapshot.run_state, RunState::Waiting);
    assert!(snapshot.unexpected.is_some());
}

#[test]
fn reset_outside_error_is_not_pending() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 1)));
    state.apply_intent(&bulk_reset("1"));
    assert!(!state.snapshot(&"1".into()).unwrap().reset_pending);
}

#[test]
fn failed_command_keeps_run_state_and_records_failure() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 1)));
    let failure = CommandFailure {
        command: UserCommand::Stop { repository_id: "1".into() },
        error: "connection refused".into(),
    };
    state.apply_intent(&Intent::CommandFailed { failure: failure.clone() });

    let snapshot = state.snapshot(&"1".into()).unwrap();
    assert_eq!(snapshot.run_state, RunState::Running);
    assert_eq!(snapshot.command_failure, Some(failure));
    assert_eq!(state.metrics.command_failures, 1);
}

#[test]
fn failed_reset_drops_pending_reset() {
    let mut state = StatusState::new();
    state.apply_intent(&status(error_event("1", "boom", 1)));
    state.apply_intent(&bulk_reset("1"));
    state.apply_intent(&Intent::CommandFailed {
        failure: CommandFailure {
            command: UserCommand::BulkReset { repository_id: "1".into() },
            error: "HTTP 500".into(),
        },
    });

    let snapshot = state.snapshot(&"1".into()).unwrap();
    assert!(!snapshot.reset_pending);
    assert_eq!(snapshot.run_state, RunState::Error);
}

#[test]
fn next_command_clears_previous_failure() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::CommandFailed {
        failure: CommandFailure {
            command: UserCommand::Start { repository_id: "1".into() },
            error: "timeout".into(),
        },
    });
    state.apply_intent(&Intent::Command {
        command: UserCommand::Start { repository_id: "1".into() },
    });
    assert!(state.snapshot(&"1".into()).unwrap().command_failure.is_none());
}

#[test]
fn record_reset_failure_is_counted_without_snapshot() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::CommandFailed {
        failure: CommandFailure {
            command: UserCommand::ResetRecord { ip_name: "ip-1".into() },
            error: "HTTP 404".into(),
        },
    });
    assert_eq!(state.metrics.command_failures, 1);
    assert!(state.snapshots.is_empty());
}
