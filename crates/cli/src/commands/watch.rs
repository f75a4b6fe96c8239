// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hc watch`: live status table, steered by commands typed on stdin.

use std::io::IsTerminal;

use anyhow::Result;
use clap::Args;
use hc_adapters::HarvesterApi;
use hc_core::{Clock, RepositoryId, SystemClock, UserCommand};
use hc_engine::{Session, SessionConfig};
use hc_storage::StatusView;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::color;
use crate::commands::harvest::check_command;
use crate::commands::status::render_table;
use crate::exit_error::ExitError;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct WatchArgs {
    /// Poll only; do not open the push channel
    #[arg(long)]
    pub no_push: bool,
}

const HELP: &str = "\
commands:
  start <id>          start a harvest
  stop <id>           interrupt a running harvest
  enable <id>         enable a repository
  disable <id>        disable a repository
  reset <id>          reset failed records of a repository
  reset-record <ip>   reset one record
  reconnect           reopen the push channel
  quit";

/// One line typed while watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchInput {
    Command(UserCommand),
    Reconnect,
    Help,
    Quit,
}

/// Parse a typed line; blank lines yield `None`.
pub fn parse_command_line(line: &str) -> Result<Option<WatchInput>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument: {extra}"));
    }

    let repository = |arg: Option<&str>| {
        arg.map(RepositoryId::new).ok_or_else(|| format!("usage: {verb} <repository id>"))
    };
    let input = match verb.to_ascii_lowercase().as_str() {
        "start" => WatchInput::Command(UserCommand::Start { repository_id: repository(arg)? }),
        "stop" => WatchInput::Command(UserCommand::Stop { repository_id: repository(arg)? }),
        "enable" => WatchInput::Command(UserCommand::Enable { repository_id: repository(arg)? }),
        "disable" => WatchInput::Command(UserCommand::Disable { repository_id: repository(arg)? }),
        "reset" => WatchInput::Command(UserCommand::BulkReset { repository_id: repository(arg)? }),
        "reset-record" => {
            let ip_name = arg.ok_or_else(|| format!("usage: {verb} <ip name>"))?;
            WatchInput::Command(UserCommand::ResetRecord { ip_name: ip_name.to_string() })
        }
        "reconnect" if arg.is_none() => WatchInput::Reconnect,
        "help" | "?" if arg.is_none() => WatchInput::Help,
        "quit" | "exit" | "q" if arg.is_none() => WatchInput::Quit,
        "reconnect" | "help" | "?" | "quit" | "exit" | "q" => {
            return Err(format!("{verb} takes no arguments"));
        }
        other => return Err(format!("unknown command: {other} (try `help`)")),
    };
    Ok(Some(input))
}

/// Whether the watch loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Act on one typed line. Feedback goes to stderr so stdout stays the table.
pub async fn execute_input<A: HarvesterApi, C: Clock>(
    session: &mut Session<A, C>,
    line: &str,
) -> Result<Flow, ExitError> {
    match parse_command_line(line) {
        Ok(None) => {}
        Ok(Some(WatchInput::Quit)) => return Ok(Flow::Quit),
        Ok(Some(WatchInput::Help)) => eprintln!("{HELP}"),
        Ok(Some(WatchInput::Reconnect)) => {
            if session.reconnect() {
                eprintln!("{}", color::muted("reconnecting push channel"));
            } else {
                eprintln!("{}", color::muted("push channel is connected or disabled"));
            }
        }
        Ok(Some(WatchInput::Command(command))) => {
            match check_command(&session.current(), &command) {
                Ok(()) => {
                    session.dispatcher().submit(command.clone()).await?;
                    eprintln!("{}", color::muted(&format!("{command} sent")));
                }
                Err(reason) => eprintln!("{}", color::warn(&reason)),
            }
        }
        Err(e) => eprintln!("{}", color::warn(&e)),
    }
    Ok(Flow::Continue)
}

/// Text frame: the table plus a one-line summary of what was folded.
pub fn render_frame(view: &StatusView) -> String {
    let mut text = if view.repositories.is_empty() {
        "No repositories\n".to_string()
    } else {
        render_table(view)
    };
    let m = &view.metrics;
    text.push_str(&color::muted(&format!(
        "events {} · stale discarded {} · unexpected {} · malformed {} · poll failures {} · command failures {}",
        m.events_applied,
        m.stale_discarded,
        m.unexpected_transitions,
        m.malformed_messages,
        m.poll_failures,
        m.command_failures,
    )));
    text.push('\n');
    text
}

fn draw(view: &StatusView, format: OutputFormat, clear: bool) -> Result<()> {
    match format {
        // One view per line
        OutputFormat::Json => println!("{}", serde_json::to_string(view)?),
        OutputFormat::Text => {
            if clear {
                print!("\x1b[2J\x1b[H");
            }
            print!("{}", render_frame(view));
        }
    }
    Ok(())
}

pub async fn handle<A: HarvesterApi>(
    api: A,
    config: SessionConfig,
    format: OutputFormat,
) -> Result<()> {
    let mut session = Session::start(api, SystemClock, config);
    let mut view_rx = session.view();
    let clear = format == OutputFormat::Text && std::io::stdout().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    if std::io::stdin().is_terminal() {
        eprintln!("{}", color::muted("type `help` for commands, `quit` to leave"));
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = std::sync::Arc::clone(&view_rx.borrow_and_update());
                draw(&view, format, clear)?;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if execute_input(&mut session, &line).await? == Flow::Quit {
                        break;
                    }
                }
                // Keep watching after stdin closes
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    stdin_open = false;
                }
            },
        }
    }

    session.shutdown().await.map_err(ExitError::from)?;
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
