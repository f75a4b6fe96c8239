// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod commands;
mod repositories;

use super::*;
pub(super) use hc_core::test_support::{
    counts_event, error_event, full_counts_event, run_state_event, socket_closed_event,
};
use hc_core::{RecordStage, Repository, RunState, StatusEvent};

pub(super) fn status(event: StatusEvent) -> Intent {
    Intent::Status { event }
}

pub(super) fn repo(id: &str) -> Repository {
    Repository::builder().id(id).name(format!("repo-{id}")).enabled(true).build()
}

// ── Status routing ──────────────────────────────────────────────────────────

#[test]
fn first_observation_creates_snapshot() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 10)));

    let snapshot = state.snapshot(&"1".into()).unwrap();
    assert_eq!(snapshot.run_state, RunState::Running);
    assert_eq!(state.metrics.events_applied, 1);
}

#[test]
fn stale_events_are_counted() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 100)));
    state.apply_intent(&status(run_state_event("1", RunState::Stopping, 95)));

    assert_eq!(state.snapshot(&"1".into()).unwrap().run_state, RunState::Running);
    assert_eq!(state.metrics.stale_discarded, 1);
}

#[test]
fn unexpected_transitions_are_counted() {
    let mut state = StatusState::new();
    state.apply_intent(&status(error_event("1", "oai down", 1)));
    state.apply_intent(&status(run_state_event("1", RunState::Running, 2)));

    assert_eq!(state.metrics.unexpected_transitions, 1);
    assert!(state.snapshot(&"1".into()).unwrap().unexpected.is_some());
}

#[test]
fn repositories_do_not_affect_each_other() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 100)));
    state.apply_intent(&status(error_event("2", "boom", 200)));
    state.apply_intent(&Intent::PollFailed { repository_id: "2".into(), error: "timeout".into() });

    let one = state.snapshot(&"1".into()).unwrap();
    assert_eq!(one.run_state, RunState::Running);
    assert!(!one.may_be_stale());
    assert_eq!(state.snapshot(&"2".into()).unwrap().run_state, RunState::Error);
}

#[test]
fn connection_wide_close_marks_every_snapshot() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 10)));
    state.apply_intent(&status(counts_event("2", &[("pending", 4)], 10)));
    state.apply_intent(&status(socket_closed_event(None, 20)));

    for id in ["1", "2"] {
        let snapshot = state.snapshot(&id.into()).unwrap();
        assert!(snapshot.connectivity.is_stale(), "repo {id} not stale");
    }
    assert_eq!(state.snapshot(&"1".into()).unwrap().run_state, RunState::Running);
    assert_eq!(state.snapshot(&"2".into()).unwrap().counts.get(&RecordStage::Pending), 4);
}

#[test]
fn fresh_poll_clears_stale_indicator() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 10)));
    state.apply_intent(&status(socket_closed_event(None, 20)));
    state.apply_intent(&Intent::PollFailed { repository_id: "1".into(), error: "refused".into() });
    assert!(state.snapshot(&"1".into()).unwrap().may_be_stale());

    state.apply_intent(&status(full_counts_event("1", &[("pending", 2)], 30)));
    assert!(!state.snapshot(&"1".into()).unwrap().may_be_stale());
}

#[test]
fn poll_then_older_push_keeps_running() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 100)));
    state.apply_intent(&status(full_counts_event(
        "1",
        &[("pending", 10), ("processing", 0)],
        100,
    )));
    state.apply_intent(&status(run_state_event("1", RunState::Stopping, 95)));

    let snapshot = state.snapshot(&"1".into()).unwrap();
    assert_eq!(snapshot.run_state, RunState::Running);
    assert_eq!(snapshot.counts.get(&RecordStage::Pending), 10);
}

#[test]
fn malformed_and_unrecognized_are_counted() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::Malformed { reason: "expected value at line 1".into() });
    state.apply_intent(&Intent::Unrecognized { tag: "record-fetcher".into() });
    state.apply_intent(&Intent::Unrecognized { tag: "stylesheet".into() });

    assert_eq!(state.metrics.malformed_messages, 1);
    assert_eq!(state.metrics.unrecognized_events, 2);
    assert!(state.snapshots.is_empty());
}

// ── View ────────────────────────────────────────────────────────────────────

#[test]
fn view_joins_directory_and_snapshots() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("1") });
    state.apply_intent(&status(run_state_event("2", RunState::Running, 10)));

    let view = state.view(7);
    assert_eq!(view.generation, 7);
    let ids: Vec<_> = view.ids().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["1", "2"]);

    let one = view.get(&"1".into()).unwrap();
    assert!(one.repository.is_some());
    assert_eq!(one.run_state(), RunState::Waiting);
    assert!(one.can_toggle_enabled());

    let two = view.get(&"2".into()).unwrap();
    assert!(two.repository.is_none());
    assert!(!two.can_start_stop());
    assert!(!two.can_toggle_enabled());
}

#[test]
fn view_lists_stale_repositories() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("1") });
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("2") });
    state.apply_intent(&Intent::PollFailed { repository_id: "2".into(), error: "timeout".into() });

    let view = state.view(0);
    let stale: Vec<_> = view.stale_ids().map(|id| id.to_string()).collect();
    assert_eq!(stale, vec!["2"]);
}

// ── Record fetcher ──────────────────────────────────────────────────────────

fn fetcher(state: hc_core::FetcherState, sequence: u64) -> Intent {
    Intent::FetcherStateChanged { state, sequence: hc_core::Sequence(sequence) }
}

#[test]
fn fetcher_state_is_last_writer_wins_by_sequence() {
    use hc_core::FetcherState;

    let mut state = StatusState::new();
    assert!(state.view(0).fetcher.is_none());

    state.apply_intent(&fetcher(FetcherState::Disabling, 20));
    state.apply_intent(&fetcher(FetcherState::Running, 10));

    let current = state.fetcher.unwrap();
    assert_eq!(current.state, FetcherState::Disabling);
    assert_eq!(current.sequence, hc_core::Sequence(20));
    assert_eq!(state.metrics.stale_discarded, 1);

    state.apply_intent(&fetcher(FetcherState::Disabled, 30));
    assert_eq!(state.view(3).fetcher.unwrap().state, FetcherState::Disabled);
}

#[test]
fn fetcher_state_does_not_touch_repositories() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("1", RunState::Running, 5)));
    state.apply_intent(&fetcher(hc_core::FetcherState::Disabled, 50));

    assert_eq!(state.snapshot(&"1".into()).unwrap().run_state, RunState::Running);
    assert_eq!(state.tracked_ids().len(), 1);
}

#[test]
fn connection_wide_close_marks_fetcher_stale_until_next_report() {
    use hc_core::FetcherState;

    let mut state = StatusState::new();
    state.apply_intent(&fetcher(FetcherState::Running, 10));
    state.apply_intent(&status(socket_closed_event(None, 20)));

    let current = state.fetcher.unwrap();
    assert_eq!(current.state, FetcherState::Running);
    assert!(current.may_be_stale());

    state.apply_intent(&fetcher(FetcherState::Running, 30));
    assert!(!state.fetcher.unwrap().may_be_stale());
}
