// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn hc_no_args_shows_usage() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn hc_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("watch")
        .stdout_has("status")
        .stdout_has("status-codes");
}

#[test]
fn hc_repo_help_shows_subcommands() {
    cli()
        .args(&["repo", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("show")
        .stdout_has("add")
        .stdout_has("edit")
        .stdout_has("rm");
}

#[test]
fn hc_records_help_shows_subcommands() {
    cli()
        .args(&["records", "--help"])
        .passes()
        .stdout_has("find")
        .stdout_has("reset")
        .stdout_has("bulk-reset");
}

#[test]
fn hc_watch_help_mentions_polling_only_mode() {
    cli().args(&["watch", "--help"]).passes().stdout_has("--no-push");
}

#[test]
fn hc_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
