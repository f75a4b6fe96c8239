// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client runtime: dispatcher, poller, and the task that owns status state.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod dispatcher;
mod error;
mod poller;
mod runtime;
mod session;

pub use dispatcher::ActionDispatcher;
pub use error::RuntimeError;
pub use poller::{PollerConfig, StatusPoller};
pub use runtime::Runtime;
pub use session::{snapshot_once, Session, SessionConfig};
