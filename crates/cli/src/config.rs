// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration, resolved in layers:
//! defaults, then the TOML file, then the environment, then flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use hc_adapters::http::parse_addr;
use hc_adapters::{Credential, HttpClient, HttpHarvesterApi, PushEndpoint, TransportError};
use hc_engine::{PollerConfig, SessionConfig};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("invalid base URL: {0}")]
    BaseUrl(#[source] TransportError),
    #[error("no auth token configured (set HC_AUTH_TOKEN, pass --token, or add `token` to the config file)")]
    MissingToken,
}

/// Config file contents. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub push_url: Option<String>,
    pub token: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub fast_poll_interval_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Read `path`; a missing file is empty unless `required`.
    pub fn read(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    fn into_overrides(self) -> Overrides {
        Overrides {
            base_url: self.base_url,
            push_url: self.push_url,
            token: self.token,
            poll_interval: self.poll_interval_ms.map(Duration::from_millis),
            fast_poll_interval: self.fast_poll_interval_ms.map(Duration::from_millis),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            log_dir: self.log_dir,
        }
    }
}

/// One layer of settings; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub push_url: Option<String>,
    pub token: Option<String>,
    pub poll_interval: Option<Duration>,
    pub fast_poll_interval: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub log_dir: Option<PathBuf>,
}

impl Overrides {
    fn over(self, lower: Overrides) -> Overrides {
        Overrides {
            base_url: self.base_url.or(lower.base_url),
            push_url: self.push_url.or(lower.push_url),
            token: self.token.or(lower.token),
            poll_interval: self.poll_interval.or(lower.poll_interval),
            fast_poll_interval: self.fast_poll_interval.or(lower.fast_poll_interval),
            request_timeout: self.request_timeout.or(lower.request_timeout),
            log_dir: self.log_dir.or(lower.log_dir),
        }
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend `host:port`
    pub base_url: String,
    pub push_url: String,
    pub credential: Credential,
    pub poller: PollerConfig,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Resolve from the config file, the environment, and `flags`.
    ///
    /// `config_path` (from `--config`) takes precedence over `HC_CONFIG`;
    /// either one makes the file mandatory.
    pub fn load(config_path: Option<PathBuf>, flags: Overrides) -> Result<Self, ConfigError> {
        let explicit = config_path.is_some() || crate::env::config_path_is_explicit();
        let file = match config_path.or_else(crate::env::config_path) {
            Some(path) => FileConfig::read(&path, explicit)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, crate::env::overrides()?, flags)
    }

    /// Fold the layers over the defaults.
    pub fn resolve(
        file: FileConfig,
        env: Overrides,
        flags: Overrides,
    ) -> Result<Self, ConfigError> {
        let merged = flags.over(env.over(file.into_overrides()));
        let defaults = PollerConfig::default();

        let base_url = merged.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let addr = parse_addr(&base_url).map_err(ConfigError::BaseUrl)?;
        let credential = merged
            .token
            .map(Credential::bearer)
            .filter(|c| !c.is_empty())
            .ok_or(ConfigError::MissingToken)?;
        let push_url = merged
            .push_url
            .unwrap_or_else(|| PushEndpoint::for_backend(&addr, credential.clone()).url);

        let poller = PollerConfig::default()
            .interval(positive("poll_interval", merged.poll_interval, defaults.interval)?)
            .fast_interval(positive(
                "fast_poll_interval",
                merged.fast_poll_interval,
                defaults.fast_interval,
            )?)
            .request_timeout(positive(
                "request_timeout",
                merged.request_timeout,
                defaults.request_timeout,
            )?);

        Ok(Self { base_url: addr, push_url, credential, poller, log_dir: merged.log_dir })
    }

    pub fn api(&self) -> Result<HttpHarvesterApi, TransportError> {
        let client =
            HttpClient::new(&self.base_url, self.credential.clone(), self.poller.request_timeout)?;
        Ok(HttpHarvesterApi::new(client))
    }

    pub fn push_endpoint(&self) -> PushEndpoint {
        PushEndpoint::new(&self.push_url, self.credential.clone())
    }

    /// Session settings; `push` false runs on polling alone.
    pub fn session(&self, push: bool) -> SessionConfig {
        SessionConfig { poller: self.poller.clone(), push: push.then(|| self.push_endpoint()) }
    }
}

fn positive(
    key: &'static str,
    value: Option<Duration>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(d) if d.is_zero() => Err(ConfigError::ZeroDuration(key)),
        Some(d) => Ok(d),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
