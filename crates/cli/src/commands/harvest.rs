// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start/stop/enable/disable handlers and the guards every command passes.

use anyhow::Result;
use hc_adapters::HarvesterApi;
use hc_core::{RunState, SystemClock, UserCommand};
use hc_engine::{snapshot_once, ActionDispatcher, PollerConfig};
use hc_storage::StatusView;
use tokio::sync::mpsc;

use crate::color;
use crate::exit_error::ExitError;
use crate::output::{print_json, OutputFormat};

/// Refuse a command the repository's current state does not allow.
///
/// Enable/disable only while the harvest is idle; start/stop only on an
/// enabled repository, start from `WAITING` and stop from `RUNNING`.
pub fn check_command(view: &StatusView, command: &UserCommand) -> Result<(), String> {
    let Some(id) = command.repository_id() else {
        return Ok(());
    };
    let Some(repo) = view.get(id).filter(|r| r.repository.is_some()) else {
        return Err(format!("repository {id} not found"));
    };
    let state = repo.run_state();
    match command {
        UserCommand::Enable { .. } | UserCommand::Disable { .. } if !repo.can_toggle_enabled() => {
            Err(format!("repository {id} is {state}; wait until it is WAITING to {}", command.verb()))
        }
        UserCommand::Enable { .. } if repo.enabled() => {
            Err(format!("repository {id} is already enabled"))
        }
        UserCommand::Disable { .. } if !repo.enabled() => {
            Err(format!("repository {id} is already disabled"))
        }
        UserCommand::Start { .. } | UserCommand::Stop { .. } if !repo.can_start_stop() => {
            Err(format!("repository {id} is disabled; enable it first"))
        }
        UserCommand::Start { .. } if state == RunState::Error => Err(format!(
            "repository {id} is in ERROR; reset its failed records first (hc records bulk-reset {id})"
        )),
        UserCommand::Start { .. } if state != RunState::Waiting => {
            Err(format!("repository {id} is already {state}"))
        }
        UserCommand::Stop { .. } if state != RunState::Running => {
            Err(format!("repository {id} is {state}, not RUNNING"))
        }
        _ => Ok(()),
    }
}

/// Poll the repository once, check the guard, then send the command.
///
/// Returns the view observed before the command; the effect arrives later
/// through status updates.
pub async fn run_guarded<A: HarvesterApi>(
    api: A,
    poller: PollerConfig,
    command: UserCommand,
) -> Result<StatusView, ExitError> {
    let only = command.repository_id().cloned();
    let view = snapshot_once(api.clone(), SystemClock, poller, only.clone()).await?;
    if let Some(id) = only.filter(|id| view.get(id).is_none_or(|r| r.repository.is_none())) {
        return Err(ExitError::not_found(format!("repository {id} not found")));
    }
    check_command(&view, &command).map_err(ExitError::not_allowed)?;
    send(api, command).await?;
    Ok(view.as_ref().clone())
}

/// Send a command and wait for the backend to accept it.
pub async fn send<A: HarvesterApi>(api: A, command: UserCommand) -> Result<(), ExitError> {
    // Follow-up intents have no runtime to land in; they are dropped with `_rx`.
    let (intent_tx, _rx) = mpsc::channel(8);
    ActionDispatcher::new(api, intent_tx).submit_and_wait(command).await?;
    Ok(())
}

pub async fn handle<A: HarvesterApi>(
    api: A,
    poller: PollerConfig,
    command: UserCommand,
    format: OutputFormat,
) -> Result<()> {
    let before = run_guarded(api, poller, command.clone()).await?;
    let state = command.repository_id().and_then(|id| before.get(id)).map(|r| r.run_state());
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "accepted": command,
            "run_state": state,
        }))?,
        OutputFormat::Text => {
            println!("{} accepted", color::header(&command.to_string()));
            if let Some(state) = state {
                println!(
                    "{}",
                    color::muted(&format!("run-state was {state}; watch with `hc watch` or `hc status`"))
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "harvest_tests.rs"]
mod tests;
