// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn token(value: &str) -> Overrides {
    Overrides { token: Some(value.to_string()), ..Overrides::default() }
}

fn clear_env() {
    for key in [
        "HC_CONFIG",
        "HC_BASE_URL",
        "HC_PUSH_URL",
        "HC_AUTH_TOKEN",
        "HC_POLL_INTERVAL_MS",
        "HC_FAST_POLL_INTERVAL_MS",
        "HC_REQUEST_TIMEOUT_MS",
        "HC_LOG_DIR",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_apply_when_only_a_token_is_given() {
    let config = ClientConfig::resolve(FileConfig::default(), token("t"), Overrides::default())
        .unwrap();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.push_url, "ws://localhost:8080/status-socket");
    assert_eq!(config.credential.header_value(), "Bearer t");
    assert_eq!(config.poller, PollerConfig::default());
    assert_eq!(config.log_dir, None);
}

#[test]
fn missing_token_is_an_error() {
    let err = ClientConfig::resolve(FileConfig::default(), Overrides::default(), Overrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingToken));

    let err = ClientConfig::resolve(FileConfig::default(), token("  "), Overrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingToken));
}

#[test]
fn layers_override_in_order() {
    let file = FileConfig {
        base_url: Some("file:1".into()),
        token: Some("file-token".into()),
        poll_interval_ms: Some(30_000),
        request_timeout_ms: Some(1_000),
        ..FileConfig::default()
    };
    let env = Overrides {
        base_url: Some("env:2".into()),
        poll_interval: Some(Duration::from_secs(20)),
        ..Overrides::default()
    };
    let flags = Overrides { base_url: Some("http://flag:3/".into()), ..Overrides::default() };

    let config = ClientConfig::resolve(file, env, flags).unwrap();

    assert_eq!(config.base_url, "flag:3");
    assert_eq!(config.push_url, "ws://flag:3/status-socket");
    assert_eq!(config.credential.header_value(), "Bearer file-token");
    assert_eq!(config.poller.interval, Duration::from_secs(20));
    assert_eq!(config.poller.request_timeout, Duration::from_secs(1));
    assert_eq!(config.poller.fast_interval, PollerConfig::default().fast_interval);
}

#[test]
fn explicit_push_url_is_kept() {
    let env = Overrides { push_url: Some("ws://push:9/ws".into()), ..token("t") };
    let config = ClientConfig::resolve(FileConfig::default(), env, Overrides::default()).unwrap();
    assert_eq!(config.push_url, "ws://push:9/ws");
    assert_eq!(config.session(true).push.map(|p| p.url), Some("ws://push:9/ws".to_string()));
    assert!(config.session(false).push.is_none());
}

#[test]
fn zero_interval_is_rejected() {
    let env = Overrides { fast_poll_interval: Some(Duration::ZERO), ..token("t") };
    let err = ClientConfig::resolve(FileConfig::default(), env, Overrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroDuration("fast_poll_interval")));
}

#[test]
fn tls_base_url_is_rejected() {
    let flags = Overrides { base_url: Some("https://secure:443".into()), ..token("t") };
    let err = ClientConfig::resolve(FileConfig::default(), Overrides::default(), flags).unwrap_err();
    assert!(matches!(err, ConfigError::BaseUrl(_)));
}

#[test]
fn file_config_parses_toml() {
    let text = r#"
base_url = "harvester:9000"
token = "abc"
fast_poll_interval_ms = 500
log_dir = "/var/log/hc"
"#;
    let file = FileConfig::parse(Path::new("config.toml"), text).unwrap();
    assert_eq!(file.base_url.as_deref(), Some("harvester:9000"));
    assert_eq!(file.fast_poll_interval_ms, Some(500));
    assert_eq!(file.log_dir, Some(PathBuf::from("/var/log/hc")));
}

#[test]
fn file_config_rejects_unknown_keys() {
    let err = FileConfig::parse(Path::new("config.toml"), "tokn = \"abc\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn missing_file_is_empty_unless_required() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert_eq!(FileConfig::read(&path, false).unwrap(), FileConfig::default());
    assert!(matches!(FileConfig::read(&path, true), Err(ConfigError::NotFound(_))));
}

#[test]
#[serial]
fn load_reads_file_then_env() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "base_url = \"from-file:1\"\ntoken = \"file\"\n").unwrap();
    std::env::set_var("HC_AUTH_TOKEN", "from-env");
    std::env::set_var("HC_POLL_INTERVAL_MS", "2500");

    let config = ClientConfig::load(Some(path), Overrides::default()).unwrap();

    assert_eq!(config.base_url, "from-file:1");
    assert_eq!(config.credential.header_value(), "Bearer from-env");
    assert_eq!(config.poller.interval, Duration::from_millis(2500));
    clear_env();
}

#[test]
#[serial]
fn load_rejects_malformed_env_duration() {
    clear_env();
    std::env::set_var("HC_AUTH_TOKEN", "t");
    std::env::set_var("HC_REQUEST_TIMEOUT_MS", "soon");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let err = ClientConfig::load(Some(path), Overrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key: "HC_REQUEST_TIMEOUT_MS", .. }));
    clear_env();
}

#[test]
#[serial]
fn explicit_config_path_must_exist() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("HC_CONFIG", dir.path().join("nope.toml"));

    let err = ClientConfig::load(None, token("t")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
    clear_env();
}
