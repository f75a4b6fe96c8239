// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status event handler: routes events through the reducer.

use hc_core::{FetcherState, Sequence, StatusEvent};

use super::reducer::{reduce, Outcome};
use super::types::{Connectivity, FetcherSnapshot};
use super::StatusState;

pub(crate) fn apply(state: &mut StatusState, event: &StatusEvent) {
    let Some(id) = event.repository_id() else {
        // Connection-wide close: every tracked snapshot goes stale.
        for snapshot in state.snapshots.values_mut() {
            *snapshot = reduce(snapshot, event).snapshot;
        }
        if let Some(fetcher) = state.fetcher.as_mut() {
            if !fetcher.connectivity.is_stale() {
                fetcher.connectivity = Connectivity::Stale { since: event.sequence() };
            }
        }
        tracing::info!(
            repositories = state.snapshots.len(),
            sequence = %event.sequence(),
            "push channel closed"
        );
        return;
    };

    if state.is_removed(id) {
        state.metrics.untracked_discarded += 1;
        tracing::debug!(event = %event.log_summary(), "discarded event for removed repository");
        return;
    }

    let Some(current) = state.snapshot_mut(id) else {
        return;
    };
    let reduction = reduce(current, event);
    *current = reduction.snapshot;

    match reduction.outcome {
        Outcome::Applied { unexpected } => {
            state.metrics.events_applied += 1;
            if let Some(transition) = unexpected {
                state.metrics.unexpected_transitions += 1;
                tracing::warn!(repository = %id, %transition, "applying unexpected transition");
            }
        }
        Outcome::Stale => {
            state.metrics.stale_discarded += 1;
            tracing::debug!(event = %event.log_summary(), "discarded stale event");
        }
        Outcome::ConnectivityLost => {
            tracing::info!(repository = %id, "push channel closed for repository");
        }
    }
}

/// Same last-writer-wins guard as a repository's run-state.
pub(crate) fn apply_fetcher(state: &mut StatusState, next: FetcherState, sequence: Sequence) {
    if let Some(current) = state.fetcher {
        if sequence <= current.sequence {
            state.metrics.stale_discarded += 1;
            tracing::debug!(state = %next, %sequence, "discarded stale record fetcher state");
            return;
        }
    }
    tracing::info!(state = %next, %sequence, "record fetcher state");
    state.fetcher =
        Some(FetcherSnapshot { state: next, sequence, connectivity: Connectivity::Live });
    state.metrics.events_applied += 1;
}
