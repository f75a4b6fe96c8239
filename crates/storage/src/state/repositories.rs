// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository directory handlers.

use hc_core::Intent;

use super::StatusState;

pub(crate) fn apply(state: &mut StatusState, intent: &Intent) {
    match intent {
        Intent::DirectoryLoaded { repositories } => {
            for repository in repositories {
                state.restore(&repository.id);
            }
            let dropped = state.directory.replace_all(repositories.clone());
            for id in &dropped {
                state.tear_down(id);
            }
            tracing::info!(
                repositories = state.directory.len(),
                dropped = dropped.len(),
                "repository directory loaded"
            );
        }

        Intent::RepositoryUpserted { repository } => {
            state.restore(&repository.id);
            state.directory.upsert(repository.clone());
        }

        Intent::RepositoryRemoved { repository_id } => {
            state.directory.remove(repository_id);
            state.tear_down(repository_id);
            tracing::info!(repository = %repository_id, "repository removed");
        }

        _ => {}
    }
}
