// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-state of the backend's record fetcher.
//!
//! The fetcher is a single global worker that downloads the objects of
//! harvested records. It is not tied to any repository.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetcherState {
    Running,
    /// Asked to stop; finishing in-flight downloads
    Disabling,
    Disabled,
}

crate::simple_display! {
    FetcherState {
        Running => "RUNNING",
        Disabling => "DISABLING",
        Disabled => "DISABLED",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown record fetcher state: {0:?}")]
pub struct UnknownFetcherState(pub String);

impl FromStr for FetcherState {
    type Err = UnknownFetcherState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RUNNING" => Ok(FetcherState::Running),
            "DISABLING" => Ok(FetcherState::Disabling),
            "DISABLED" => Ok(FetcherState::Disabled),
            _ => Err(UnknownFetcherState(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
