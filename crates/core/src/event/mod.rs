// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status events: the typed deltas both the push channel and the poller produce.

mod methods;

use crate::record_status::RecordStatusCounts;
use crate::repository::RepositoryId;
use crate::run_state::RunState;
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};

/// How a counts event combines with what is already known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountsMode {
    /// Only the carried stages change; others keep their counts.
    #[default]
    Merge,
    /// The event is a full report: stages it does not carry drop to zero.
    Replace,
}

/// A change in a repository's status, stamped with a sequence marker.
///
/// Serializes with `{"type": "event:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StatusEvent {
    #[serde(rename = "run_state:changed")]
    RunStateChanged { repository_id: RepositoryId, run_state: RunState, sequence: Sequence },

    #[serde(rename = "record_counts:changed")]
    RecordCountsChanged {
        repository_id: RepositoryId,
        counts: RecordStatusCounts,
        #[serde(default)]
        mode: CountsMode,
        sequence: Sequence,
    },

    /// The harvest failed; run-state becomes `Error`.
    #[serde(rename = "error:raised")]
    ErrorRaised { repository_id: RepositoryId, message: String, sequence: Sequence },

    /// The push connection dropped. `None` scopes it to every tracked repository.
    #[serde(rename = "socket:closed")]
    SocketClosed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        repository_id: Option<RepositoryId>,
        sequence: Sequence,
    },
}

#[cfg(test)]
#[path = "method_tests.rs"]
mod tests;
