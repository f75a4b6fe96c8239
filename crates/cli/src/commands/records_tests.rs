// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_adapters::{ApiCall, FakeHarvesterApi};
use hc_core::Repository;
use hc_wire::{RecordError, RecordSummary};
use serial_test::serial;

fn failed_record(ip_name: &str) -> RecordDetail {
    RecordDetail {
        summary: RecordSummary {
            ip_name: ip_name.to_string(),
            oai_identifier: format!("oai:example.org:{ip_name}"),
            repository_id: "1".into(),
            state: "failure".to_string(),
            ts_create: None,
            ts_processed: None,
        },
        fingerprint: None,
        errors: vec![RecordError {
            message: "download failed".to_string(),
            url: Some("http://files.example.org/a.pdf".to_string()),
            status_code: Some(404),
            ts_created: None,
        }],
    }
}

#[tokio::test]
async fn reset_refetches_the_record() {
    let api = FakeHarvesterApi::new();
    api.add_record(failed_record("ip-1"));

    let record = reset_record(api.clone(), "ip-1").await.unwrap();

    assert_eq!(record.summary.state, "pending");
    assert!(record.errors.is_empty());
    let calls = api.calls();
    assert_eq!(
        calls,
        vec![ApiCall::ResetRecord("ip-1".into()), ApiCall::Record("ip-1".into())]
    );
}

#[tokio::test]
async fn reset_of_unknown_record_fails() {
    let api = FakeHarvesterApi::new();

    let err = reset_record(api, "missing").await.unwrap_err();

    assert!(err.message.starts_with("record reset failed, try again"), "{}", err.message);
}

#[tokio::test]
async fn bulk_reset_of_unknown_repository_is_refused() {
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("1").build());

    let err = handle(
        RecordsCommand::BulkReset { repository_id: "2".into() },
        api.clone(),
        PollerConfig::default(),
        OutputFormat::Json,
    )
    .await
    .unwrap_err();

    assert_eq!(crate::exit_error::exit_code(&err), crate::exit_error::NOT_FOUND);
    assert!(!api.calls().iter().any(|c| matches!(c, ApiCall::BulkReset(_))));
}

#[tokio::test]
async fn blank_query_is_rejected_locally() {
    let api = FakeHarvesterApi::new();
    let find = RecordsCommand::Find { query: "  ".into() };
    let result = handle(find, api.clone(), PollerConfig::default(), OutputFormat::Json).await;
    assert!(result.is_err());
    assert!(api.calls().is_empty());
}

#[test]
#[serial]
fn render_shows_errors_with_status_codes() {
    std::env::set_var("NO_COLOR", "1");

    let text = render_record(&failed_record("ip-9"));

    assert!(text.starts_with("Record ip-9\n"));
    assert!(text.contains("  state:      failure\n"));
    assert!(text.contains("  [404] download failed\n"));
    assert!(text.contains("    http://files.example.org/a.pdf\n"));
}
