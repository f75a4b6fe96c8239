// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use hc_adapters::{ApiCall, FakeHarvesterApi};
use serial_test::serial;

fn full_form() -> FormArgs {
    FormArgs {
        name: Some("Narcis".into()),
        url: Some("http://oai.example.org/oai".into()),
        metadata_prefix: Some("nl_didl".into()),
        set: None,
        schedule: Some(Schedule::Weekly),
    }
}

#[test]
fn flags_overlay_only_what_was_given() {
    let stored = Repository::builder().id("4").name("old").set("theses").build();
    let flags = FormArgs { name: Some("new".into()), ..FormArgs::default() };

    let form = flags.apply(RepositoryForm::from_repository(&stored));

    assert_eq!(form.name, "new");
    assert_eq!(form.set, "theses");
    assert_eq!(form.url, stored.url);
}

#[test]
fn blank_required_fields_are_reported() {
    let flags = FormArgs { name: Some("x".into()), ..FormArgs::default() };
    let err = validated(flags.apply(empty_form())).unwrap_err();
    assert_eq!(err.message, "missing required fields: url, metadataPrefix");
}

#[tokio::test]
async fn add_creates_a_disabled_repository() {
    let api = FakeHarvesterApi::new();

    handle(RepoCommand::Add { form: full_form() }, &api, OutputFormat::Json).await.unwrap();

    let created = api.repository("1").unwrap();
    assert_eq!(created.name, "Narcis");
    assert_eq!(created.schedule, Schedule::Weekly);
    assert!(!created.enabled);
}

#[tokio::test]
async fn edit_is_refused_while_enabled() {
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("2").enabled(true).build());

    let err = handle(
        RepoCommand::Edit { id: "2".into(), form: full_form() },
        &api,
        OutputFormat::Json,
    )
    .await
    .unwrap_err();

    assert_eq!(crate::exit_error::exit_code(&err), crate::exit_error::NOT_ALLOWED);
    assert!(!api.calls().iter().any(|c| matches!(c, ApiCall::UpdateRepository(_))));
}

#[tokio::test]
async fn edit_updates_a_disabled_repository() {
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("2").name("before").build());
    let flags = FormArgs { name: Some("after".into()), ..FormArgs::default() };

    handle(RepoCommand::Edit { id: "2".into(), form: flags }, &api, OutputFormat::Json)
        .await
        .unwrap();

    assert_eq!(api.repository("2").map(|r| r.name), Some("after".to_string()));
}

#[tokio::test]
async fn rm_deletes_a_disabled_repository() {
    let api = FakeHarvesterApi::new();
    api.add_repository(Repository::builder().id("6").build());

    handle(RepoCommand::Rm { id: "6".into() }, &api, OutputFormat::Json).await.unwrap();

    assert!(api.repository("6").is_none());
}

#[test]
#[serial]
fn render_lists_every_field() {
    std::env::set_var("NO_COLOR", "1");
    let r = Repository::builder().id("9").name("Narcis").enabled(true).build();

    let text = render_repository(&r);

    assert!(text.starts_with("Repository 9\n"));
    assert!(text.contains("  name:       Narcis\n"));
    assert!(text.contains("  set:        -\n"));
    assert!(text.contains("  enabled:    yes\n"));
}
