// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    running = { "RUNNING", FetcherState::Running },
    disabling = { "DISABLING", FetcherState::Disabling },
    disabled_lowercase = { "disabled", FetcherState::Disabled },
)]
fn parses_wire_label(label: &str, expected: FetcherState) {
    assert_eq!(label.parse::<FetcherState>(), Ok(expected));
}

#[test]
fn rejects_repository_run_states() {
    assert_eq!(
        "WAITING".parse::<FetcherState>(),
        Err(UnknownFetcherState("WAITING".to_string()))
    );
}

#[test]
fn display_matches_serde_label() {
    for state in [FetcherState::Running, FetcherState::Disabling, FetcherState::Disabled] {
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, format!("\"{state}\""));
    }
}
