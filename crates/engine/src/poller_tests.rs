// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_adapters::{ApiCall, FakeHarvesterApi};
use hc_core::{CountsMode, FakeClock, RecordStage, Repository, RunState, Sequence};
use hc_storage::StatusState;

struct Harness {
    poller: StatusPoller<FakeHarvesterApi, FakeClock>,
    api: FakeHarvesterApi,
    intent_rx: mpsc::Receiver<Intent>,
}

fn setup(config: PollerConfig) -> Harness {
    let api = FakeHarvesterApi::new();
    let clock = FakeClock::new();
    clock.set_epoch_ms(50_000);
    let (intent_tx, intent_rx) = mpsc::channel(256);
    let poller = StatusPoller::new(api.clone(), Sequencer::new(clock), config, intent_tx);
    Harness { poller, api, intent_rx }
}

fn drain(rx: &mut mpsc::Receiver<Intent>) -> Vec<Intent> {
    let mut intents = Vec::new();
    while let Ok(intent) = rx.try_recv() {
        intents.push(intent);
    }
    intents
}

fn count(api: &FakeHarvesterApi, call: ApiCall) -> usize {
    api.calls().into_iter().filter(|c| *c == call).count()
}

#[test]
fn default_cadence() {
    let config = PollerConfig::default();
    assert_eq!(config.interval, Duration::from_secs(10));
    assert_eq!(config.fast_interval, Duration::from_secs(2));
    assert_eq!(config.request_timeout, Duration::from_secs(5));

    let tuned = PollerConfig::default().interval(Duration::from_secs(30));
    assert_eq!(tuned.interval, Duration::from_secs(30));
    assert_eq!(tuned.fast_interval, Duration::from_secs(2));
}

#[tokio::test]
async fn poll_uses_response_marker_then_request_marker() {
    let h = setup(PollerConfig::default());
    h.api.set_run_state("1", RunState::Running, Some(100));
    h.api.set_record_status("1", &[("pending", 10), ("processing", 0)], None);

    let events = h.poller.poll(&RepositoryId::new("1")).await.unwrap();

    assert_eq!(
        events[0],
        StatusEvent::RunStateChanged {
            repository_id: RepositoryId::new("1"),
            run_state: RunState::Running,
            sequence: Sequence(100),
        }
    );
    let StatusEvent::RecordCountsChanged { counts, mode, sequence, .. } = &events[1] else {
        panic!("expected counts");
    };
    assert_eq!(*mode, CountsMode::Replace);
    assert_eq!(*sequence, Sequence(50_000));
    assert_eq!(counts.get(&RecordStage::Pending), 10);
}

#[tokio::test]
async fn unreachable_backend_is_poll_failure() {
    let mut h = setup(PollerConfig::default());
    h.api.fail("record_status");

    h.poller.refresh(&RepositoryId::new("1")).await.unwrap();

    let intents = drain(&mut h.intent_rx);
    assert_eq!(intents.len(), 1);
    let Intent::PollFailed { repository_id, error } = &intents[0] else {
        panic!("expected poll failure, got {intents:?}");
    };
    assert_eq!(repository_id, "1");
    assert!(error.contains("503"), "{error}");
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out() {
    let h = setup(PollerConfig::default().request_timeout(Duration::from_millis(50)));
    h.api.hang("run_state");

    let err = h.poller.poll(&RepositoryId::new("1")).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn initial_load_dispatches_directory_then_polls() {
    let mut h = setup(PollerConfig::default());
    h.api.add_repository(Repository::builder().id("1").build());
    h.api.add_repository(Repository::builder().id("2").build());

    h.poller.initial_load().await.unwrap();

    let intents = drain(&mut h.intent_rx);
    assert!(matches!(&intents[0], Intent::DirectoryLoaded { repositories } if repositories.len() == 2));
    let polled: Vec<_> = intents[1..]
        .iter()
        .filter_map(|i| match i {
            Intent::Status { event } => event.repository_id().map(|id| id.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(polled.len(), 4);
    assert!(polled.contains(&"1".to_string()) && polled.contains(&"2".to_string()));
}

#[tokio::test]
async fn failed_listing_is_transport_error() {
    let h = setup(PollerConfig::default());
    h.api.fail("list_repositories");
    assert!(matches!(h.poller.initial_load().await, Err(RuntimeError::Transport(_))));
}

#[tokio::test]
async fn stopped_runtime_is_reported() {
    let Harness { poller, intent_rx, .. } = setup(PollerConfig::default());
    drop(intent_rx);
    let err = poller.refresh(&RepositoryId::new("1")).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Stopped));
}

/// View with repositories 1 and 2, where 2 may be stale.
fn view_with_stale_two() -> Arc<StatusView> {
    let mut state = StatusState::new();
    state.apply_intent(&Intent::DirectoryLoaded {
        repositories: vec![Repository::builder().id("1").build(), Repository::builder().id("2").build()],
    });
    state.apply_intent(&Intent::PollFailed { repository_id: "2".into(), error: "timeout".into() });
    Arc::new(state.view(1))
}

#[tokio::test(start_paused = true)]
async fn stale_repositories_are_polled_faster() {
    let h = setup(PollerConfig::default());
    h.api.add_repository(Repository::builder().id("1").build());
    h.api.add_repository(Repository::builder().id("2").build());
    let (_view_tx, view_rx) = watch::channel(view_with_stale_two());
    let (_demand_tx, demand_rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let Harness { poller, api, intent_rx: _intent_rx } = h;
    let task = tokio::spawn(poller.run(view_rx, demand_rx, shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(4_100)).await;
    shutdown.cancel();
    task.await.unwrap();

    // initial load + two fast rounds for 2; only the initial load for 1
    assert_eq!(count(&api, ApiCall::RunState("1".into())), 1);
    assert_eq!(count(&api, ApiCall::RunState("2".into())), 3);
}

#[tokio::test(start_paused = true)]
async fn every_tracked_repository_is_polled_on_the_slow_interval() {
    let h = setup(PollerConfig::default());
    let (_view_tx, view_rx) = watch::channel(view_with_stale_two());
    let (_demand_tx, demand_rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let Harness { poller, api, intent_rx: _intent_rx } = h;
    let task = tokio::spawn(poller.run(view_rx, demand_rx, shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(10_100)).await;
    shutdown.cancel();
    task.await.unwrap();

    // empty directory at startup, so only the slow round reaches 1
    assert_eq!(count(&api, ApiCall::RunState("1".into())), 1);
    assert!(count(&api, ApiCall::RunState("2".into())) >= 5);
}

#[tokio::test(start_paused = true)]
async fn demand_request_polls_immediately() {
    let h = setup(PollerConfig::default());
    let (_view_tx, view_rx) = watch::channel(Arc::new(StatusView::default()));
    let (demand_tx, demand_rx) = mpsc::channel(4);
    let shutdown = CancellationToken::new();
    let Harness { poller, api, intent_rx: _intent_rx } = h;
    let task = tokio::spawn(poller.run(view_rx, demand_rx, shutdown.clone()));

    demand_tx.send(RepositoryId::new("9")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();
    task.await.unwrap();

    assert_eq!(count(&api, ApiCall::RunState("9".into())), 1);
}
