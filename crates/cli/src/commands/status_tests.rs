// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_adapters::FakeHarvesterApi;
use hc_core::{
    CommandFailure, FetcherState, Repository, RunState, Sequence, UnexpectedTransition,
    UserCommand,
};
use hc_storage::{FetcherSnapshot, RepositorySnapshot};
use serial_test::serial;

fn plain() {
    std::env::set_var("NO_COLOR", "1");
    std::env::remove_var("COLOR");
}

fn row(id: &str, enabled: bool) -> RepositoryView {
    RepositoryView {
        repository_id: id.into(),
        repository: Some(
            Repository::builder().id(id).name(format!("repo-{id}")).enabled(enabled).build(),
        ),
        snapshot: RepositorySnapshot::new(id.into()),
    }
}

#[test]
#[serial]
fn table_lists_counts_per_stage() {
    plain();
    let mut repo = row("1", true);
    repo.snapshot.run_state = RunState::Running;
    repo.snapshot.counts.set(RecordStage::Pending, 10);
    repo.snapshot.counts.set(RecordStage::Processed, 250);
    let view = StatusView {
        generation: 3,
        repositories: vec![repo],
        fetcher: None,
        metrics: Default::default(),
    };

    let text = render_table(&view);
    let mut lines = text.lines();

    let header = lines.next().unwrap();
    assert!(header.starts_with("ID  NAME    STATE"), "{header}");
    let line = lines.next().unwrap();
    let cells: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(&cells[..8], ["1", "repo-1", "RUNNING", "10", "0", "0", "250", "0"]);
    assert!(line.contains("Daily"));
    assert!(lines.next().is_none(), "no stale footer expected");
}

#[test]
#[serial]
fn stale_rows_are_named_in_footer() {
    plain();
    let mut stale = row("2", true);
    stale.snapshot.connectivity = Connectivity::Stale { since: Sequence(5) };
    let mut failed = row("4", true);
    failed.snapshot.poll_error = Some("request timed out after 5000ms".into());
    let view = StatusView {
        generation: 1,
        repositories: vec![row("1", true), stale, failed],
        fetcher: None,
        metrics: Default::default(),
    };

    let text = render_table(&view);

    assert!(text.ends_with("data may be stale for: 2, 4\n"), "{text}");
    assert!(text.contains("push disconnected"));
    assert!(text.contains("poll failed: request timed out"));
}

#[test]
#[serial]
fn record_fetcher_state_follows_the_table() {
    plain();
    let view = StatusView {
        generation: 2,
        repositories: vec![row("1", true)],
        fetcher: Some(FetcherSnapshot {
            state: FetcherState::Disabling,
            sequence: Sequence(40),
            connectivity: Connectivity::Live,
        }),
        metrics: Default::default(),
    };

    let text = render_table(&view);
    assert!(text.ends_with("record fetcher: DISABLING\n"), "{text}");
}

#[test]
#[serial]
fn record_fetcher_line_flags_lost_push_channel() {
    plain();
    let view = StatusView {
        fetcher: Some(FetcherSnapshot {
            state: FetcherState::Running,
            sequence: Sequence(40),
            connectivity: Connectivity::Stale { since: Sequence(41) },
        }),
        ..StatusView::default()
    };

    assert_eq!(
        fetcher_line(&view).as_deref(),
        Some("record fetcher: RUNNING (push disconnected)")
    );
    assert_eq!(fetcher_line(&StatusView::default()), None);
}

#[test]
fn notes_cover_flags_and_failures() {
    let mut repo = row("7", true);
    repo.snapshot.unexpected =
        Some(UnexpectedTransition { from: RunState::Error, to: RunState::Running });
    repo.snapshot.command_failure = Some(CommandFailure {
        command: UserCommand::Start { repository_id: "7".into() },
        error: "HTTP 503: busy".into(),
    });
    repo.snapshot.last_error = Some("OAI endpoint unreachable".into());

    assert_eq!(
        notes(&repo),
        vec![
            "start failed, try again (HTTP 503: busy)".to_string(),
            "unexpected run-state transition ERROR -> RUNNING".to_string(),
            "error: OAI endpoint unreachable".to_string(),
        ]
    );
}

#[test]
#[serial]
fn detail_shows_unknown_stages_too() {
    plain();
    let mut repo = row("5", false);
    repo.snapshot.counts.set(RecordStage::Failure, 3);
    repo.snapshot.counts.set(RecordStage::Other("quarantined".into()), 1);

    let text = render_detail(&repo);

    assert!(text.contains("  enabled:     no"));
    assert!(text.contains("  failure:       3"));
    assert!(text.contains("  quarantined:   1"));
    assert!(text.contains("  state:       WAITING"));
}

#[tokio::test]
#[serial]
async fn unknown_repository_is_not_found() {
    plain();
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("1").build());

    let err = handle(api, PollerConfig::default(), Some("9".into()), OutputFormat::Text)
        .await
        .unwrap_err();

    assert_eq!(crate::exit_error::exit_code(&err), crate::exit_error::NOT_FOUND);
}
