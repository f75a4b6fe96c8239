// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn removed_repository_is_not_resurrected_by_in_flight_poll() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("1") });
    state.apply_intent(&status(run_state_event("1", RunState::Running, 10)));

    state.apply_intent(&Intent::RepositoryRemoved { repository_id: "1".into() });
    state.apply_intent(&status(full_counts_event("1", &[("pending", 3)], 20)));
    state.apply_intent(&Intent::PollFailed { repository_id: "1".into(), error: "timeout".into() });

    assert!(state.snapshot(&"1".into()).is_none());
    assert!(state.directory.get(&"1".into()).is_none());
    assert!(state.tracked_ids().is_empty());
    assert_eq!(state.metrics.untracked_discarded, 1);
}

#[test]
fn registering_again_lifts_removal() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("1") });
    state.apply_intent(&Intent::RepositoryRemoved { repository_id: "1".into() });
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("1") });
    state.apply_intent(&status(run_state_event("1", RunState::Running, 30)));

    assert!(!state.is_removed(&"1".into()));
    assert_eq!(state.snapshot(&"1".into()).unwrap().run_state, RunState::Running);
}

#[test]
fn directory_reload_tears_down_missing_repositories() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::DirectoryLoaded { repositories: vec![repo("1"), repo("2")] });
    state.apply_intent(&status(run_state_event("2", RunState::Running, 10)));

    state.apply_intent(&Intent::DirectoryLoaded { repositories: vec![repo("1")] });

    assert!(state.snapshot(&"2".into()).is_none());
    assert!(state.is_removed(&"2".into()));
    assert_eq!(state.directory.len(), 1);
}

#[test]
fn directory_reload_keeps_push_only_snapshots() {
    let mut state = StatusState::new();
    state.apply_intent(&status(run_state_event("9", RunState::Running, 10)));
    state.apply_intent(&Intent::DirectoryLoaded { repositories: vec![repo("1")] });

    assert!(state.snapshot(&"9".into()).is_some());
    let ids: Vec<_> = state.tracked_ids().into_iter().map(|id| id.to_string()).collect();
    assert_eq!(ids, vec!["1", "9"]);
}

#[test]
fn commands_for_removed_repository_are_ignored() {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::RepositoryUpserted { repository: repo("1") });
    state.apply_intent(&Intent::RepositoryRemoved { repository_id: "1".into() });
    state.apply_intent(&Intent::Command {
        command: hc_core::UserCommand::Start { repository_id: "1".into() },
    });
    assert!(state.snapshots.is_empty());
}
