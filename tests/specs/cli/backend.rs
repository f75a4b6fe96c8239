// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands against a canned backend

use crate::prelude::*;

fn repositories(enabled: bool) -> String {
    format!(
        r#"[{{"id":1,"name":"narcis","url":"http://oai.example.org/oai","metadataPrefix":"nl_didl","set":"","enabled":{enabled},"schedule":"DAILY"}}]"#
    )
}

fn backend(enabled: bool, run_state: &str) -> Backend {
    Backend::start(vec![
        ("GET", "/repositories", 200, repositories(enabled)),
        ("GET", "/harvesters/1/status", 200, format!(r#"{{"runState":"{run_state}"}}"#)),
        (
            "GET",
            "/record-status/1",
            200,
            r#"{"counts":{"pending":12,"processing":3,"failure":1}}"#.to_string(),
        ),
        ("POST", "/harvesters/1/start", 200, String::new()),
        ("POST", "/harvesters/1/interrupt", 503, "busy".to_string()),
        ("PUT", "/records/bulk-reset/1", 200, String::new()),
        (
            "GET",
            "/record-status/status-codes",
            200,
            r#"[{"code":200,"status":"OK"},{"code":-1,"status":"Timeout"}]"#.to_string(),
        ),
    ])
}

#[test]
fn status_prints_run_state_and_counts() {
    let backend = backend(true, "RUNNING");

    cli()
        .against(&backend)
        .args(&["status"])
        .passes()
        .stdout_has("narcis")
        .stdout_has("RUNNING")
        .stdout_has("12");

    assert!(backend
        .seen()
        .iter()
        .all(|s| s.authorization.as_deref() == Some("Bearer secret")));
}

#[test]
fn status_json_is_machine_readable() {
    let backend = backend(true, "WAITING");

    let out = cli().against(&backend).args(&["-o", "json", "status", "1"]).passes();

    let value: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(value["snapshot"]["run_state"], "WAITING");
    assert_eq!(value["snapshot"]["counts"]["pending"], 12);
}

#[test]
fn start_is_sent_when_allowed() {
    let backend = backend(true, "WAITING");

    cli().against(&backend).args(&["start", "1"]).passes().stdout_has("start 1 accepted");

    assert!(backend.seen().iter().any(|s| s.method == "POST" && s.path == "/harvesters/1/start"));
}

#[test]
fn start_on_disabled_repository_is_refused_locally() {
    let backend = backend(false, "WAITING");

    cli()
        .against(&backend)
        .args(&["start", "1"])
        .fails()
        .code_is(5)
        .stderr_has("enable it first");

    assert!(!backend.seen().iter().any(|s| s.path == "/harvesters/1/start"));
}

#[test]
fn rejected_stop_reports_try_again() {
    let backend = backend(true, "RUNNING");

    cli()
        .against(&backend)
        .args(&["stop", "1"])
        .fails()
        .code_is(1)
        .stderr_has("stop failed, try again");
}

#[test]
fn unknown_repository_is_not_found() {
    let backend = backend(true, "WAITING");

    cli().against(&backend).args(&["status", "42"]).fails().code_is(6);
}

#[test]
fn bulk_reset_reaches_the_backend() {
    let backend = backend(true, "ERROR");

    cli().against(&backend).args(&["records", "bulk-reset", "1"]).passes();

    assert!(backend.seen().iter().any(|s| s.method == "PUT" && s.path == "/records/bulk-reset/1"));
}

#[test]
fn status_codes_are_listed_in_order() {
    let backend = backend(true, "WAITING");

    let out = cli().against(&backend).args(&["status-codes"]).passes();

    let timeout = out.stdout.find("Timeout").unwrap();
    let ok = out.stdout.find("OK").unwrap();
    assert!(timeout < ok, "{}", out.stdout);
}
