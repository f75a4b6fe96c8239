// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{CountsMode, RecordStatusCounts, RepositoryId, RunState, Sequence, StatusEvent};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for status types.
pub mod strategies {
    use crate::{RecordStage, RunState};
    use proptest::prelude::*;

    pub fn arb_run_state() -> impl Strategy<Value = RunState> {
        prop_oneof![
            Just(RunState::Waiting),
            Just(RunState::Running),
            Just(RunState::Stopping),
            Just(RunState::Error),
        ]
    }

    pub fn arb_stage() -> impl Strategy<Value = RecordStage> {
        prop_oneof![
            Just(RecordStage::Pending),
            Just(RecordStage::Processing),
            Just(RecordStage::Failure),
            Just(RecordStage::Processed),
            Just(RecordStage::InPreprocessing),
        ]
    }
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn run_state_event(id: &str, run_state: RunState, sequence: u64) -> StatusEvent {
    StatusEvent::RunStateChanged {
        repository_id: RepositoryId::new(id),
        run_state,
        sequence: Sequence(sequence),
    }
}

pub fn counts_event(id: &str, counts: &[(&str, u64)], sequence: u64) -> StatusEvent {
    StatusEvent::RecordCountsChanged {
        repository_id: RepositoryId::new(id),
        counts: counts.iter().copied().collect::<RecordStatusCounts>(),
        mode: CountsMode::Merge,
        sequence: Sequence(sequence),
    }
}

pub fn full_counts_event(id: &str, counts: &[(&str, u64)], sequence: u64) -> StatusEvent {
    StatusEvent::RecordCountsChanged {
        repository_id: RepositoryId::new(id),
        counts: counts.iter().copied().collect::<RecordStatusCounts>(),
        mode: CountsMode::Replace,
        sequence: Sequence(sequence),
    }
}

pub fn error_event(id: &str, message: &str, sequence: u64) -> StatusEvent {
    StatusEvent::ErrorRaised {
        repository_id: RepositoryId::new(id),
        message: message.to_string(),
        sequence: Sequence(sequence),
    }
}

pub fn socket_closed_event(id: Option<&str>, sequence: u64) -> StatusEvent {
    StatusEvent::SocketClosed { repository_id: id.map(RepositoryId::new), sequence: Sequence(sequence) }
}
