// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure type definitions for repository status snapshots.

use hc_core::{
    CommandFailure, FetcherState, RecordStage, RecordStatusCounts, RepositoryId, RunState, Sequence,
    UnexpectedTransition,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether the push channel is known to be delivering for a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Connectivity {
    #[default]
    Live,
    /// The push connection dropped at `since`; cleared by a newer event.
    Stale { since: Sequence },
}

impl Connectivity {
    pub fn is_stale(&self) -> bool {
        matches!(self, Connectivity::Stale { .. })
    }
}

/// The authoritative view of one repository's run-state and record counts.
///
/// Every field that events write carries its own sequence stamp; the reducer
/// refuses any event whose sequence is not newer than the stamp of the field
/// it would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub repository_id: RepositoryId,
    pub run_state: RunState,
    pub counts: RecordStatusCounts,
    /// Highest sequence applied to any field
    pub last_updated_at: Sequence,
    /// Stamp of the last applied run-state (or error) event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_state_seq: Option<Sequence>,
    /// Stamp of the last applied value per stage
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stage_seqs: BTreeMap<RecordStage, Sequence>,
    /// Stamp of the last full report; every stage it left out reads as 0 as of here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts_replaced_seq: Option<Sequence>,
    #[serde(default)]
    pub connectivity: Connectivity,
    /// Last poll failure, cleared by the next status event for the repository
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_error: Option<String>,
    /// Last command the backend did not take, cleared by the next command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_failure: Option<CommandFailure>,
    /// Set by a transition outside the table, cleared by an expected one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unexpected: Option<UnexpectedTransition>,
    /// An explicit reset was issued while in `Error`
    #[serde(default)]
    pub reset_pending: bool,
    /// Message of the error that put the repository in `Error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl RepositorySnapshot {
    pub fn new(repository_id: RepositoryId) -> Self {
        Self {
            repository_id,
            run_state: RunState::Waiting,
            counts: RecordStatusCounts::new(),
            last_updated_at: Sequence::ZERO,
            run_state_seq: None,
            stage_seqs: BTreeMap::new(),
            counts_replaced_seq: None,
            connectivity: Connectivity::Live,
            poll_error: None,
            command_failure: None,
            unexpected: None,
            reset_pending: false,
            last_error: None,
        }
    }

    /// Data shown for this repository may be out of date.
    pub fn may_be_stale(&self) -> bool {
        self.connectivity.is_stale() || self.poll_error.is_some()
    }

    /// Whether `sequence` is newer than what the run-state already reflects.
    pub fn run_state_is_older_than(&self, sequence: Sequence) -> bool {
        self.run_state_seq.is_none_or(|applied| sequence > applied)
    }

    /// Whether `sequence` is newer than what `stage` already reflects, either
    /// from its own value or from a full report that covered it.
    pub fn stage_is_older_than(&self, stage: &RecordStage, sequence: Sequence) -> bool {
        let applied = self.stage_seqs.get(stage).copied().max(self.counts_replaced_seq);
        applied.is_none_or(|applied| sequence > applied)
    }

    /// Whether a full report at `sequence` is newer than the last one applied.
    pub fn counts_are_replaceable_at(&self, sequence: Sequence) -> bool {
        self.counts_replaced_seq.is_none_or(|applied| sequence > applied)
    }
}

/// Last known run-state of the backend's global record fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherSnapshot {
    pub state: FetcherState,
    /// Stamp of the applied fetcher event
    pub sequence: Sequence,
    #[serde(default)]
    pub connectivity: Connectivity,
}

impl FetcherSnapshot {
    pub fn may_be_stale(&self) -> bool {
        self.connectivity.is_stale()
    }
}
