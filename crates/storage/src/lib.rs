// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc-storage: in-memory status state folded from intents

mod directory;
mod metrics;
mod state;

pub use directory::RepositoryDirectory;
pub use metrics::StatusMetrics;
pub use state::{
    reduce, Connectivity, FetcherSnapshot, Outcome, Reduction, RepositorySnapshot, RepositoryView, StatusState,
    StatusView,
};
