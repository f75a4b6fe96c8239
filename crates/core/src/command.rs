// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator commands sent to the harvesting backend.

use crate::repository::RepositoryId;
use serde::{Deserialize, Serialize};

/// A command an operator issues.
///
/// Commands are fire-and-forget: the state change they cause arrives later
/// as a status event, never as the command's return value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum UserCommand {
    /// Start a harvest for the repository
    Start { repository_id: RepositoryId },
    /// Interrupt a running harvest
    Stop { repository_id: RepositoryId },
    Enable { repository_id: RepositoryId },
    Disable { repository_id: RepositoryId },
    /// Reset every failed record of the repository to pending.
    ///
    /// This is the explicit reset that lets a repository leave `Error`.
    BulkReset { repository_id: RepositoryId },
    /// Reset a single record (by its ip name) to pending
    ResetRecord { ip_name: String },
}

impl UserCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            UserCommand::Start { .. } => "start",
            UserCommand::Stop { .. } => "stop",
            UserCommand::Enable { .. } => "enable",
            UserCommand::Disable { .. } => "disable",
            UserCommand::BulkReset { .. } => "bulk reset",
            UserCommand::ResetRecord { .. } => "record reset",
        }
    }

    /// Repository the command targets; record resets are not repository-scoped.
    pub fn repository_id(&self) -> Option<&RepositoryId> {
        match self {
            UserCommand::Start { repository_id }
            | UserCommand::Stop { repository_id }
            | UserCommand::Enable { repository_id }
            | UserCommand::Disable { repository_id }
            | UserCommand::BulkReset { repository_id } => Some(repository_id),
            UserCommand::ResetRecord { .. } => None,
        }
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, UserCommand::BulkReset { .. })
    }
}

impl std::fmt::Display for UserCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserCommand::ResetRecord { ip_name } => write!(f, "{} {}", self.verb(), ip_name),
            other => match other.repository_id() {
                Some(id) => write!(f, "{} {}", other.verb(), id),
                None => f.write_str(other.verb()),
            },
        }
    }
}

/// A command the backend did not accept or could not be reached for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandFailure {
    pub command: UserCommand,
    pub error: String,
}

impl CommandFailure {
    /// Message an operator can act on, e.g. "start failed, try again".
    pub fn message(&self) -> String {
        format!("{} failed, try again ({})", self.command.verb(), self.error)
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
