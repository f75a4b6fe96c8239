// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll response bodies and their translation into status events.

use hc_core::{CountsMode, RecordStatusCounts, RepositoryId, RunState, Sequence, StatusEvent};
use serde::{Deserialize, Serialize};

/// Body of `GET /harvesters/<id>/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStateResponse {
    pub run_state: RunState,
    /// Backend's own ordering marker, when it sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Sequence>,
}

impl RunStateResponse {
    /// `requested_at` is used when the response carries no marker.
    pub fn into_event(self, repository_id: RepositoryId, requested_at: Sequence) -> StatusEvent {
        StatusEvent::RunStateChanged {
            repository_id,
            run_state: self.run_state,
            sequence: self.sequence.unwrap_or(requested_at),
        }
    }
}

/// Body of `GET /record-status/<id>`: a full per-stage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatusResponse {
    #[serde(default)]
    pub counts: RecordStatusCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Sequence>,
}

impl RecordStatusResponse {
    /// Poll reports are complete, so stages they omit are zeroed.
    pub fn into_event(self, repository_id: RepositoryId, requested_at: Sequence) -> StatusEvent {
        StatusEvent::RecordCountsChanged {
            repository_id,
            counts: self.counts,
            mode: CountsMode::Replace,
            sequence: self.sequence.unwrap_or(requested_at),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
