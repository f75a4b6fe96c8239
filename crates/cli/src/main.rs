// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hc: operator console for the metadata harvester

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;
mod output;
mod table;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hc_core::{RepositoryId, UserCommand};

use commands::{harvest, records, repo, status, status_codes, watch};
use config::{ClientConfig, Overrides};
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "hc",
    version,
    about = "Watch and steer metadata harvest runs",
    styles = color::styles()
)]
struct Cli {
    /// Backend address, host:port (overrides HC_BASE_URL)
    #[arg(long, global = true, value_name = "HOST:PORT")]
    base_url: Option<String>,

    /// API token (overrides HC_AUTH_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Config file (overrides HC_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "output", global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live status table; type commands on stdin while it runs
    Watch(watch::WatchArgs),
    /// Poll once and print run-state and record counts
    Status {
        /// Only this repository
        id: Option<RepositoryId>,
    },
    /// Start a harvest (repository must be enabled and WAITING)
    Start { id: RepositoryId },
    /// Interrupt a running harvest
    Stop { id: RepositoryId },
    /// Enable a repository (harvest must be WAITING)
    Enable { id: RepositoryId },
    /// Disable a repository (harvest must be WAITING)
    Disable { id: RepositoryId },
    /// Manage repository definitions
    Repo(repo::RepoArgs),
    /// Look up and reset records
    Records(records::RecordsArgs),
    /// List the backend's processing status codes
    StatusCodes,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(exit_error::exit_code(&err));
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let flags = Overrides { base_url: cli.base_url, token: cli.token, ..Overrides::default() };
    let config = ClientConfig::load(cli.config, flags).map_err(ExitError::from)?;
    let _log_guard = logging::init(config.log_dir.as_deref());

    let api = config.api().map_err(ExitError::from)?;
    let poller = config.poller.clone();
    let format = cli.output;

    match cli.command {
        Commands::Watch(args) => watch::handle(api, config.session(!args.no_push), format).await,
        Commands::Status { id } => status::handle(api, poller, id, format).await,
        Commands::Start { id } => {
            harvest::handle(api, poller, UserCommand::Start { repository_id: id }, format).await
        }
        Commands::Stop { id } => {
            harvest::handle(api, poller, UserCommand::Stop { repository_id: id }, format).await
        }
        Commands::Enable { id } => {
            harvest::handle(api, poller, UserCommand::Enable { repository_id: id }, format).await
        }
        Commands::Disable { id } => {
            harvest::handle(api, poller, UserCommand::Disable { repository_id: id }, format).await
        }
        Commands::Repo(args) => repo::handle(args.command, &api, format).await,
        Commands::Records(args) => records::handle(args.command, api, poller, format).await,
        Commands::StatusCodes => status_codes::handle(&api, format).await,
    }
}
