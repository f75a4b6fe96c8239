// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Intents: the single closed vocabulary the store is folded over.

use crate::command::{CommandFailure, UserCommand};
use crate::event::StatusEvent;
use crate::fetcher::FetcherState;
use crate::repository::{Repository, RepositoryId};
use crate::sequence::Sequence;
use serde::{Deserialize, Serialize};

/// Everything that can change the client's view, from any source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// A push or poll status delta
    Status { event: StatusEvent },
    /// An operator command was issued
    Command { command: UserCommand },
    /// The backend rejected (or never received) a command
    CommandFailed { failure: CommandFailure },
    /// A poll for the repository failed; the last snapshot is kept
    PollFailed { repository_id: RepositoryId, error: String },
    /// A full repository listing replaced the directory
    DirectoryLoaded { repositories: Vec<Repository> },
    RepositoryUpserted { repository: Repository },
    RepositoryRemoved { repository_id: RepositoryId },
    /// The global record fetcher reported its run-state
    FetcherStateChanged { state: FetcherState, sequence: Sequence },
    /// A push message could not be parsed
    Malformed { reason: String },
    /// A push message carried a type tag this client does not know
    Unrecognized { tag: String },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Status { .. } => "status",
            Intent::Command { .. } => "command",
            Intent::CommandFailed { .. } => "command:failed",
            Intent::PollFailed { .. } => "poll:failed",
            Intent::DirectoryLoaded { .. } => "directory:loaded",
            Intent::RepositoryUpserted { .. } => "repository:upserted",
            Intent::RepositoryRemoved { .. } => "repository:removed",
            Intent::FetcherStateChanged { .. } => "push:fetcher",
            Intent::Malformed { .. } => "push:malformed",
            Intent::Unrecognized { .. } => "push:unrecognized",
        }
    }
}

impl From<StatusEvent> for Intent {
    fn from(event: StatusEvent) -> Self {
        Intent::Status { event }
    }
}

impl From<UserCommand> for Intent {
    fn from(command: UserCommand) -> Self {
        Intent::Command { command }
    }
}
