// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only copies of the state handed to presentation code.

use hc_core::{Repository, RepositoryId, RunState};
use serde::Serialize;

use super::types::{FetcherSnapshot, RepositorySnapshot};
use super::StatusState;
use crate::metrics::StatusMetrics;

/// One repository as presentation code sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryView {
    pub repository_id: RepositoryId,
    /// Static attributes, absent until the directory knows the repository
    pub repository: Option<Repository>,
    pub snapshot: RepositorySnapshot,
}

impl RepositoryView {
    pub fn run_state(&self) -> RunState {
        self.snapshot.run_state
    }

    pub fn may_be_stale(&self) -> bool {
        self.snapshot.may_be_stale()
    }

    pub fn enabled(&self) -> bool {
        self.repository.as_ref().is_some_and(|r| r.enabled)
    }

    /// Enable/disable only makes sense while the harvest is idle.
    pub fn can_toggle_enabled(&self) -> bool {
        self.run_state().is_idle()
    }

    /// Only enabled repositories can be started or stopped.
    pub fn can_start_stop(&self) -> bool {
        self.enabled()
    }
}

/// Immutable copy of the whole state at one point in the intent stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusView {
    /// Number of intents folded so far
    pub generation: u64,
    pub repositories: Vec<RepositoryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetcher: Option<FetcherSnapshot>,
    pub metrics: StatusMetrics,
}

impl StatusView {
    pub fn get(&self, id: &RepositoryId) -> Option<&RepositoryView> {
        self.repositories.iter().find(|view| &view.repository_id == id)
    }

    /// Repositories whose data may be out of date.
    pub fn stale_ids(&self) -> impl Iterator<Item = &RepositoryId> {
        self.repositories.iter().filter(|v| v.may_be_stale()).map(|v| &v.repository_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RepositoryId> {
        self.repositories.iter().map(|v| &v.repository_id)
    }
}

impl StatusState {
    /// Build a view of every tracked repository, ordered by id.
    pub fn view(&self, generation: u64) -> StatusView {
        let repositories = self
            .tracked_ids()
            .into_iter()
            .map(|id| RepositoryView {
                repository: self.directory.get(&id).cloned(),
                snapshot: self
                    .snapshot(&id)
                    .cloned()
                    .unwrap_or_else(|| RepositorySnapshot::new(id.clone())),
                repository_id: id,
            })
            .collect();
        StatusView { generation, repositories, fetcher: self.fetcher, metrics: self.metrics }
    }
}
