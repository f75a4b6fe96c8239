// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration and connectivity failures

use crate::prelude::*;

#[test]
fn missing_token_is_a_config_error() {
    cli().args(&["status"]).fails().code_is(2).stderr_has("no auth token configured");
}

#[test]
fn tls_base_url_is_rejected() {
    cli()
        .args(&["--token", "t", "--base-url", "https://harvester:443", "status"])
        .fails()
        .code_is(2)
        .stderr_has("invalid base URL");
}

#[test]
fn explicit_config_file_must_exist() {
    cli()
        .args(&["--config", "/nonexistent/hc.toml", "status"])
        .fails()
        .code_is(2)
        .stderr_has("config file not found");
}

#[test]
fn token_can_come_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hc.toml");
    std::fs::write(&path, "token = \"t\"\nbase_url = \"127.0.0.1:1\"\n").unwrap();

    // Past config resolution: fails on the connection, not the token.
    cli().args(&["--config", path.to_str().unwrap(), "status"]).fails().code_is(3);
}

#[test]
fn unreachable_backend_exits_with_code_3() {
    cli()
        .args(&["--token", "t", "--base-url", "127.0.0.1:1", "status"])
        .fails()
        .code_is(3)
        .stderr_has("connect to 127.0.0.1:1 failed");
}
