// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single task that owns [`StatusState`].
//!
//! Intents are applied one at a time, synchronously, in channel order. A fresh
//! [`StatusView`] is published once per batch of queued intents, so a burst
//! of push frames builds one view instead of one per frame.

use hc_core::Intent;
use hc_storage::{StatusState, StatusView};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Most intents folded before a view is published.
pub const MAX_BATCH: usize = 64;

pub struct Runtime {
    state: StatusState,
    intent_rx: mpsc::Receiver<Intent>,
    view_tx: watch::Sender<Arc<StatusView>>,
    generation: u64,
}

impl Runtime {
    pub fn new(intent_rx: mpsc::Receiver<Intent>) -> (Self, watch::Receiver<Arc<StatusView>>) {
        let state = StatusState::new();
        let (view_tx, view_rx) = watch::channel(Arc::new(state.view(0)));
        (Self { state, intent_rx, view_tx, generation: 0 }, view_rx)
    }

    pub fn state(&self) -> &StatusState {
        &self.state
    }

    /// Apply one intent and publish the resulting view.
    pub fn apply(&mut self, intent: &Intent) {
        self.fold(intent);
        self.publish();
    }

    /// Apply `first` plus whatever is already queued (up to [`MAX_BATCH`]),
    /// then publish once. Returns how many intents were applied.
    pub fn apply_batch(&mut self, first: &Intent) -> usize {
        self.fold(first);
        let mut applied = 1;
        while applied < MAX_BATCH {
            let Ok(next) = self.intent_rx.try_recv() else {
                break;
            };
            self.fold(&next);
            applied += 1;
        }
        self.publish();
        applied
    }

    fn fold(&mut self, intent: &Intent) {
        tracing::debug!(intent = intent.name(), "applying intent");
        self.state.apply_intent(intent);
        self.generation += 1;
    }

    fn publish(&self) {
        self.view_tx.send_replace(Arc::new(self.state.view(self.generation)));
    }

    /// Apply intents until every sender is dropped or `shutdown` fires.
    pub async fn run(mut self, shutdown: CancellationToken) -> StatusState {
        loop {
            tokio::select! {
                intent = self.intent_rx.recv() => match intent {
                    Some(intent) => {
                        self.apply_batch(&intent);
                    }
                    None => break,
                },
                _ = shutdown.cancelled() => break,
            }
        }
        tracing::info!(
            generation = self.generation,
            applied = self.state.metrics.events_applied,
            stale = self.state.metrics.stale_discarded,
            "status runtime stopped"
        );
        self.state
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
