// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event methods: name, repository scope, sequence, log summary

use super::StatusEvent;
use crate::repository::RepositoryId;
use crate::sequence::Sequence;

impl StatusEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::RunStateChanged { .. } => "run_state:changed",
            StatusEvent::RecordCountsChanged { .. } => "record_counts:changed",
            StatusEvent::ErrorRaised { .. } => "error:raised",
            StatusEvent::SocketClosed { .. } => "socket:closed",
        }
    }

    /// Repository the event is scoped to; `None` for a connection-wide close.
    pub fn repository_id(&self) -> Option<&RepositoryId> {
        match self {
            StatusEvent::RunStateChanged { repository_id, .. }
            | StatusEvent::RecordCountsChanged { repository_id, .. }
            | StatusEvent::ErrorRaised { repository_id, .. } => Some(repository_id),
            StatusEvent::SocketClosed { repository_id, .. } => repository_id.as_ref(),
        }
    }

    pub fn sequence(&self) -> Sequence {
        match self {
            StatusEvent::RunStateChanged { sequence, .. }
            | StatusEvent::RecordCountsChanged { sequence, .. }
            | StatusEvent::ErrorRaised { sequence, .. }
            | StatusEvent::SocketClosed { sequence, .. } => *sequence,
        }
    }

    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            StatusEvent::RunStateChanged { repository_id, run_state, sequence } => {
                format!("{t} repo={repository_id} state={run_state} seq={sequence}")
            }
            StatusEvent::RecordCountsChanged { repository_id, counts, mode, sequence } => {
                format!(
                    "{t} repo={repository_id} stages={} mode={mode:?} seq={sequence}",
                    counts.len()
                )
            }
            StatusEvent::ErrorRaised { repository_id, message, sequence } => {
                format!("{t} repo={repository_id} seq={sequence} message={message}")
            }
            StatusEvent::SocketClosed { repository_id: Some(id), sequence } => {
                format!("{t} repo={id} seq={sequence}")
            }
            StatusEvent::SocketClosed { repository_id: None, sequence } => {
                format!("{t} repo=* seq={sequence}")
            }
        }
    }
}
