// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The status fold: `reduce(snapshot, event) -> snapshot`.
//!
//! Pure and total. No I/O, no clock, no logging; callers decide what to do
//! with the [`Outcome`].

use hc_core::{CountsMode, RecordStage, RecordStatusCounts, RunState, Sequence, StatusEvent};
use hc_core::UnexpectedTransition;

use super::types::{Connectivity, RepositorySnapshot};

/// What happened when an event was folded into a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one field changed or was re-stamped.
    Applied {
        /// The run-state change was outside the transition table.
        unexpected: Option<UnexpectedTransition>,
    },
    /// Every field the event touches already reflects a newer sequence.
    Stale,
    /// Connectivity flag set; run-state and counts untouched.
    ConnectivityLost,
}

/// Result of one fold step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    pub snapshot: RepositorySnapshot,
    pub outcome: Outcome,
}

/// Fold `event` into `current`, returning the next snapshot.
pub fn reduce(current: &RepositorySnapshot, event: &StatusEvent) -> Reduction {
    let mut next = current.clone();
    let outcome = match event {
        StatusEvent::RunStateChanged { run_state, sequence, .. } => {
            observe(&mut next, *sequence);
            apply_run_state(&mut next, *run_state, *sequence, None)
        }
        StatusEvent::ErrorRaised { message, sequence, .. } => {
            observe(&mut next, *sequence);
            apply_run_state(&mut next, RunState::Error, *sequence, Some(message))
        }
        StatusEvent::RecordCountsChanged { counts, mode, sequence, .. } => {
            observe(&mut next, *sequence);
            apply_counts(&mut next, counts, *mode, *sequence)
        }
        StatusEvent::SocketClosed { sequence, .. } => {
            next.connectivity = match current.connectivity {
                // Keep the earliest loss marker: anything newer than it clears the flag.
                Connectivity::Stale { since } => Connectivity::Stale { since: since.min(*sequence) },
                Connectivity::Live => Connectivity::Stale { since: *sequence },
            };
            Outcome::ConnectivityLost
        }
    };
    Reduction { snapshot: next, outcome }
}

/// Delivery of any status event proves the backend is reachable again.
fn observe(snapshot: &mut RepositorySnapshot, sequence: Sequence) {
    snapshot.poll_error = None;
    if let Connectivity::Stale { since } = snapshot.connectivity {
        if sequence > since {
            snapshot.connectivity = Connectivity::Live;
        }
    }
}

fn apply_run_state(
    snapshot: &mut RepositorySnapshot,
    next: RunState,
    sequence: Sequence,
    error: Option<&String>,
) -> Outcome {
    if !snapshot.run_state_is_older_than(sequence) {
        return Outcome::Stale;
    }

    let prev = snapshot.run_state;
    let mut unexpected = None;
    if prev != next {
        if prev.is_expected_transition(next, snapshot.reset_pending) {
            snapshot.unexpected = None;
        } else {
            let flagged = UnexpectedTransition { from: prev, to: next };
            snapshot.unexpected = Some(flagged);
            unexpected = Some(flagged);
        }
        if prev == RunState::Error {
            snapshot.reset_pending = false;
            snapshot.last_error = None;
        }
    }
    if let Some(message) = error {
        snapshot.last_error = Some(message.clone());
    }

    snapshot.run_state = next;
    snapshot.run_state_seq = Some(sequence);
    stamp(snapshot, sequence);
    Outcome::Applied { unexpected }
}

fn apply_counts(
    snapshot: &mut RepositorySnapshot,
    counts: &RecordStatusCounts,
    mode: CountsMode,
    sequence: Sequence,
) -> Outcome {
    let mut touched: Vec<(RecordStage, u64)> =
        counts.iter().map(|(stage, count)| (stage.clone(), count)).collect();
    let replaces = mode == CountsMode::Replace && snapshot.counts_are_replaceable_at(sequence);
    if replaces {
        // A full report that omits a known stage says it is empty.
        for stage in snapshot.counts.stages() {
            if !counts.contains(stage) {
                touched.push((stage.clone(), 0));
            }
        }
    }

    // Stage checks run before the watermark moves, which would cover them all.
    let mut applied = false;
    for (stage, count) in touched {
        if !snapshot.stage_is_older_than(&stage, sequence) {
            continue;
        }
        snapshot.counts.set(stage.clone(), count);
        snapshot.stage_seqs.insert(stage, sequence);
        applied = true;
    }
    if replaces {
        snapshot.counts_replaced_seq = Some(sequence);
        applied = true;
    }
    if counts.is_empty() && mode == CountsMode::Merge {
        applied = sequence > snapshot.last_updated_at;
    }

    if applied {
        stamp(snapshot, sequence);
        Outcome::Applied { unexpected: None }
    } else {
        Outcome::Stale
    }
}

fn stamp(snapshot: &mut RepositorySnapshot, sequence: Sequence) {
    snapshot.last_updated_at = snapshot.last_updated_at.max(sequence);
}

#[cfg(test)]
#[path = "reducer_tests.rs"]
mod tests;
