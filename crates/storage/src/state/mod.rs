// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status state folded from intents

mod commands;
mod reducer;
mod repositories;
mod status;
mod types;
mod view;

pub use reducer::{reduce, Outcome, Reduction};
pub use types::{Connectivity, FetcherSnapshot, RepositorySnapshot};
pub use view::{RepositoryView, StatusView};

use crate::directory::RepositoryDirectory;
use crate::metrics::StatusMetrics;
use hc_core::{Intent, RepositoryId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Everything the client knows, built only by folding intents.
///
/// Owned by a single task; everyone else reads [`StatusView`] copies.
#[derive(Debug, Default, Clone)]
pub struct StatusState {
    pub snapshots: HashMap<RepositoryId, RepositorySnapshot>,
    pub directory: RepositoryDirectory,
    /// Repositories deleted this session. Late results for them are
    /// discarded until the repository is registered again.
    removed: HashSet<RepositoryId>,
    /// Unknown until the push channel reports it
    pub fetcher: Option<FetcherSnapshot>,
    pub metrics: StatusMetrics,
}

impl StatusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, id: &RepositoryId) -> Option<&RepositorySnapshot> {
        self.snapshots.get(id)
    }

    pub fn is_removed(&self, id: &RepositoryId) -> bool {
        self.removed.contains(id)
    }

    /// Repositories worth polling: everything in the directory or observed.
    pub fn tracked_ids(&self) -> BTreeSet<RepositoryId> {
        self.directory.ids().chain(self.snapshots.keys()).cloned().collect()
    }

    /// Apply an intent.
    ///
    /// Synchronous and infallible: every intent either changes the state,
    /// or is discarded and counted.
    pub fn apply_intent(&mut self, intent: &Intent) {
        match intent {
            Intent::Status { event } => status::apply(self, event),

            Intent::Command { .. }
            | Intent::CommandFailed { .. }
            | Intent::PollFailed { .. } => commands::apply(self, intent),

            Intent::DirectoryLoaded { .. }
            | Intent::RepositoryUpserted { .. }
            | Intent::RepositoryRemoved { .. } => repositories::apply(self, intent),

            Intent::FetcherStateChanged { state, sequence } => {
                status::apply_fetcher(self, *state, *sequence)
            }

            Intent::Malformed { reason } => {
                self.metrics.malformed_messages += 1;
                tracing::warn!(%reason, "dropped malformed push message");
            }
            Intent::Unrecognized { tag } => {
                self.metrics.unrecognized_events += 1;
                tracing::warn!(%tag, "dropped push message with unrecognized type");
            }
        }
    }

    /// Snapshot for `id`, created on first observation.
    ///
    /// `None` for a repository removed this session.
    fn snapshot_mut(&mut self, id: &RepositoryId) -> Option<&mut RepositorySnapshot> {
        if self.removed.contains(id) {
            return None;
        }
        Some(
            self.snapshots
                .entry(id.clone())
                .or_insert_with(|| RepositorySnapshot::new(id.clone())),
        )
    }

    fn tear_down(&mut self, id: &RepositoryId) {
        self.snapshots.remove(id);
        self.removed.insert(id.clone());
    }

    fn restore(&mut self, id: &RepositoryId) {
        self.removed.remove(id);
    }
}

#[cfg(test)]
#[path = "../state_tests/mod.rs"]
mod tests;
