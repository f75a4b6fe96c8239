// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON shapes exchanged with the harvester backend.
//!
//! Push messages arrive as tagged JSON objects over the status socket;
//! everything else is a plain HTTP response body.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod push;
mod records;
mod status;

pub use push::{decode_push, Decoded, MalformedEventError};
pub use records::{RecordDetail, RecordError, RecordSummary, RepositoryForm, StatusCodeEntry};
pub use status::{RecordStatusResponse, RunStateResponse};
