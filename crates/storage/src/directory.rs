// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Known repositories and their static attributes.

use hc_core::{Repository, RepositoryId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Repositories keyed by id.
///
/// Admin-driven CRUD with a single writer, so last write wins.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryDirectory {
    repositories: BTreeMap<RepositoryId, Repository>,
}

impl RepositoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a repository, returning the previous entry.
    pub fn upsert(&mut self, repository: Repository) -> Option<Repository> {
        self.repositories.insert(repository.id.clone(), repository)
    }

    pub fn remove(&mut self, id: &RepositoryId) -> Option<Repository> {
        self.repositories.remove(id)
    }

    pub fn get(&self, id: &RepositoryId) -> Option<&Repository> {
        self.repositories.get(id)
    }

    pub fn contains(&self, id: &RepositoryId) -> bool {
        self.repositories.contains_key(id)
    }

    /// Repositories in id order.
    pub fn list(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RepositoryId> {
        self.repositories.keys()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Replace the whole directory with a fresh listing.
    ///
    /// Returns the ids that were known before and are absent now.
    pub fn replace_all(&mut self, repositories: Vec<Repository>) -> Vec<RepositoryId> {
        let next: BTreeMap<_, _> =
            repositories.into_iter().map(|repo| (repo.id.clone(), repo)).collect();
        let dropped =
            self.repositories.keys().filter(|id| !next.contains_key(*id)).cloned().collect();
        self.repositories = next;
        dropped
    }
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
