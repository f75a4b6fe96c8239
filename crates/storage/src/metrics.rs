// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observability counters kept alongside the snapshots.

use serde::{Deserialize, Serialize};

/// Counts of notable outcomes since the session started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMetrics {
    pub events_applied: u64,
    /// Events older than what the touched fields already reflect
    pub stale_discarded: u64,
    pub unexpected_transitions: u64,
    /// Events for repositories removed during the session
    pub untracked_discarded: u64,
    pub malformed_messages: u64,
    pub unrecognized_events: u64,
    pub poll_failures: u64,
    pub command_failures: u64,
}
