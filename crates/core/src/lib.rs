// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc-core: status vocabulary shared by every harvest-console crate

pub mod macros;

pub mod clock;
pub mod command;
pub mod event;
pub mod fetcher;
pub mod id;
pub mod intent;
pub mod record_status;
pub mod repository;
pub mod run_state;
pub mod sequence;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{CommandFailure, UserCommand};
pub use event::{CountsMode, StatusEvent};
pub use fetcher::{FetcherState, UnknownFetcherState};
pub use id::short;
pub use intent::Intent;
pub use record_status::{RecordStage, RecordStatusCounts};
#[cfg(any(test, feature = "test-support"))]
pub use repository::RepositoryBuilder;
pub use repository::{Repository, RepositoryId, Schedule};
pub use run_state::{RunState, UnexpectedTransition, UnknownRunState};
pub use sequence::{Sequence, Sequencer};
