// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_adapters::{ApiCall, FakeHarvesterApi};
use hc_core::{FakeClock, Repository, RunState};
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;
use yare::parameterized;

fn cmd(command: UserCommand) -> Option<WatchInput> {
    Some(WatchInput::Command(command))
}

#[parameterized(
    start = { "start 3", cmd(UserCommand::Start { repository_id: "3".into() }) },
    stop_padded = { "  stop   12 ", cmd(UserCommand::Stop { repository_id: "12".into() }) },
    enable = { "enable 1", cmd(UserCommand::Enable { repository_id: "1".into() }) },
    disable_upper = { "DISABLE 1", cmd(UserCommand::Disable { repository_id: "1".into() }) },
    reset = { "reset 4", cmd(UserCommand::BulkReset { repository_id: "4".into() }) },
    reset_record = { "reset-record ip-7", cmd(UserCommand::ResetRecord { ip_name: "ip-7".into() }) },
    reconnect = { "reconnect", Some(WatchInput::Reconnect) },
    help = { "?", Some(WatchInput::Help) },
    quit = { "q", Some(WatchInput::Quit) },
    blank = { "   ", None },
)]
fn parses(line: &str, expected: Option<WatchInput>) {
    assert_eq!(parse_command_line(line), Ok(expected));
}

#[parameterized(
    missing_id = { "start", "usage: start <repository id>" },
    extra_arg = { "stop 1 2", "unexpected argument: 2" },
    unknown = { "launch 1", "unknown command: launch (try `help`)" },
    quit_with_arg = { "quit now", "quit takes no arguments" },
)]
fn rejects(line: &str, message: &str) {
    assert_eq!(parse_command_line(line), Err(message.to_string()));
}

#[test]
#[serial]
fn frame_ends_with_metrics_line() {
    std::env::set_var("NO_COLOR", "1");
    let mut view = StatusView::default();
    view.metrics.events_applied = 7;
    view.metrics.stale_discarded = 2;

    let text = render_frame(&view);

    assert!(text.starts_with("No repositories\n"));
    assert!(text.ends_with(
        "events 7 · stale discarded 2 · unexpected 0 · malformed 0 · poll failures 0 · command failures 0\n"
    ));
}

async fn loaded_session(api: &FakeHarvesterApi) -> Session<FakeHarvesterApi, FakeClock> {
    let session = Session::start(api.clone(), FakeClock::new(), SessionConfig::default());
    let mut view_rx = session.view();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let view = Arc::clone(&view_rx.borrow_and_update());
            let polled = view.repositories.iter().all(|r| r.snapshot.run_state_seq.is_some());
            if !view.repositories.is_empty() && polled {
                break;
            }
            view_rx.changed().await.unwrap();
        }
    })
    .await
    .unwrap();
    session
}

#[tokio::test]
async fn typed_command_is_dispatched() {
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("1").enabled(true).build());
    let mut session = loaded_session(&api).await;

    assert_eq!(execute_input(&mut session, "start 1").await.unwrap(), Flow::Continue);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !api.calls().contains(&ApiCall::Start("1".into())) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn guarded_command_is_not_dispatched() {
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("1").enabled(true).build());
    api.set_run_state("1", RunState::Running, Some(5));
    let mut session = loaded_session(&api).await;

    execute_input(&mut session, "disable 1").await.unwrap();
    session.shutdown().await.unwrap();

    assert!(!api.calls().iter().any(|c| matches!(c, ApiCall::SetEnabled(..))));
}

#[tokio::test]
async fn quit_ends_the_loop() {
    let api = FakeHarvesterApi::new();
    let mut session = Session::start(api, FakeClock::new(), SessionConfig::default());
    assert_eq!(execute_input(&mut session, "quit").await.unwrap(), Flow::Quit);
    session.shutdown().await.unwrap();
}
