// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use hc_adapters::TransportError;
use hc_engine::RuntimeError;

use crate::config::ConfigError;

/// Any failure not covered below
pub const FAILURE: i32 = 1;
/// Bad or incomplete configuration (missing token, invalid URL)
pub const CONFIG: i32 = 2;
/// The backend could not be reached or timed out
pub const UNREACHABLE: i32 = 3;
/// The backend answered with a non-success status
pub const REJECTED: i32 = 4;
/// A command was refused locally because the repository is in the wrong state
pub const NOT_ALLOWED: i32 = 5;
/// The named repository or record does not exist
pub const NOT_FOUND: i32 = 6;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new(NOT_ALLOWED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(NOT_FOUND, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

impl From<ConfigError> for ExitError {
    fn from(err: ConfigError) -> Self {
        Self::new(CONFIG, err.to_string())
    }
}

impl From<TransportError> for ExitError {
    fn from(err: TransportError) -> Self {
        Self::new(transport_code(&err), err.to_string())
    }
}

fn transport_code(err: &TransportError) -> i32 {
    match err {
        TransportError::InvalidAddress(_) => CONFIG,
        TransportError::Status { status: 404, .. } => NOT_FOUND,
        TransportError::Status { .. } => REJECTED,
        TransportError::Connect { .. }
        | TransportError::Io(_)
        | TransportError::Timeout(_)
        | TransportError::WebSocket(_) => UNREACHABLE,
        TransportError::InvalidResponse(_) | TransportError::Decode(_) => FAILURE,
    }
}

impl From<RuntimeError> for ExitError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Transport(err) => err.into(),
            other => Self::new(FAILURE, other.to_string()),
        }
    }
}

/// Map any error to its exit code; unknown errors exit with [`FAILURE`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(exit) = err.downcast_ref::<ExitError>() {
        return exit.code;
    }
    if err.is::<ConfigError>() {
        return CONFIG;
    }
    if let Some(transport) = err.downcast_ref::<TransportError>() {
        return transport_code(transport);
    }
    FAILURE
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
