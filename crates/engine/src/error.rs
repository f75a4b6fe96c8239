// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use hc_adapters::TransportError;
use thiserror::Error;

/// Errors surfaced by the client runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{}", .0.message())]
    CommandFailed(hc_core::CommandFailure),
    #[error("status runtime has stopped")]
    Stopped,
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
