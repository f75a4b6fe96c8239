// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend adapters: HTTP transport, harvester API, push channel.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod api;
pub mod credential;
pub mod http;
pub mod push;

pub use api::{HarvesterApi, HttpHarvesterApi};
pub use credential::Credential;
pub use http::{HttpClient, Method, TransportError};
pub use push::{frame_intent, status_bridge, PushEndpoint};

#[cfg(any(test, feature = "test-support"))]
pub use api::{ApiCall, FakeHarvesterApi};
