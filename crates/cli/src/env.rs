// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{ConfigError, Overrides};

/// Config file location: HC_CONFIG > <config_dir>/hc/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = var("HC_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("hc").join("config.toml"))
}

/// Whether `HC_CONFIG` was set explicitly (a missing file is then an error).
pub fn config_path_is_explicit() -> bool {
    var("HC_CONFIG").is_some()
}

/// Config values supplied through the environment.
pub fn overrides() -> Result<Overrides, ConfigError> {
    Ok(Overrides {
        base_url: var("HC_BASE_URL"),
        push_url: var("HC_PUSH_URL"),
        token: var("HC_AUTH_TOKEN"),
        poll_interval: millis("HC_POLL_INTERVAL_MS")?,
        fast_poll_interval: millis("HC_FAST_POLL_INTERVAL_MS")?,
        request_timeout: millis("HC_REQUEST_TIMEOUT_MS")?,
        log_dir: var("HC_LOG_DIR").map(PathBuf::from),
    })
}

/// Log filter directive (default: warn)
pub fn log_filter() -> String {
    var("HC_LOG").unwrap_or_else(|| "warn".to_string())
}

/// `NO_COLOR=1` disables color, `COLOR=1` forces it.
pub fn color_override() -> Option<bool> {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return Some(false);
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return Some(true);
    }
    None
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn millis(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidValue { key, value: raw })
        })
        .transpose()
}
