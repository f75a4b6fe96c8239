// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_core::test_support::{counts_event, run_state_event};
use hc_core::{RecordStage, RepositoryId, RunState};

fn status(event: hc_core::StatusEvent) -> Intent {
    Intent::Status { event }
}

#[test]
fn apply_publishes_new_generation() {
    let (_tx, rx) = mpsc::channel(4);
    let (mut runtime, view_rx) = Runtime::new(rx);
    assert_eq!(view_rx.borrow().generation, 0);

    runtime.apply(&status(run_state_event("1", RunState::Running, 10)));

    let view = view_rx.borrow().clone();
    assert_eq!(view.generation, 1);
    assert_eq!(view.get(&RepositoryId::new("1")).unwrap().run_state(), RunState::Running);
}

#[tokio::test]
async fn queued_intents_are_folded_into_one_view() {
    let (tx, rx) = mpsc::channel(8);
    let (mut runtime, mut view_rx) = Runtime::new(rx);
    view_rx.borrow_and_update();

    tx.send(status(run_state_event("1", RunState::Stopping, 11))).await.unwrap();
    tx.send(status(run_state_event("1", RunState::Waiting, 12))).await.unwrap();

    let applied = runtime.apply_batch(&status(run_state_event("1", RunState::Running, 10)));

    assert_eq!(applied, 3);
    assert!(view_rx.has_changed().unwrap());
    let view = view_rx.borrow_and_update().clone();
    assert_eq!(view.generation, 3);
    assert_eq!(view.get(&RepositoryId::new("1")).unwrap().run_state(), RunState::Waiting);
}

#[tokio::test]
async fn batch_is_capped() {
    let (tx, rx) = mpsc::channel(MAX_BATCH + 1);
    let (mut runtime, _view_rx) = Runtime::new(rx);
    for seq in 0..MAX_BATCH as u64 {
        tx.send(status(counts_event("1", &[("pending", seq)], seq + 1))).await.unwrap();
    }

    let applied = runtime.apply_batch(&status(counts_event("1", &[("pending", 0)], 0)));

    assert_eq!(applied, MAX_BATCH);
    let snapshot = runtime.state().snapshot(&RepositoryId::new("1")).unwrap();
    assert_eq!(snapshot.counts.get(&RecordStage::Pending), MAX_BATCH as u64 - 2);
    assert_eq!(runtime.intent_rx.len(), 1);
}

#[tokio::test]
async fn run_applies_in_channel_order_until_senders_drop() {
    let (tx, rx) = mpsc::channel(8);
    let (runtime, view_rx) = Runtime::new(rx);
    let task = tokio::spawn(runtime.run(CancellationToken::new()));

    tx.send(status(counts_event("1", &[("pending", 2), ("processing", 1)], 10))).await.unwrap();
    tx.send(status(counts_event("1", &[("processing", 5)], 11))).await.unwrap();
    drop(tx);

    let state = task.await.unwrap();
    let snapshot = state.snapshot(&RepositoryId::new("1")).unwrap();
    assert_eq!(snapshot.counts.get(&RecordStage::Pending), 2);
    assert_eq!(snapshot.counts.get(&RecordStage::Processing), 5);
    assert_eq!(view_rx.borrow().generation, 2);
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let (_tx, rx) = mpsc::channel::<Intent>(1);
    let (runtime, _view_rx) = Runtime::new(rx);
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(runtime.run(shutdown.clone()));

    shutdown.cancel();
    let state = task.await.unwrap();
    assert!(state.snapshots.is_empty());
}
