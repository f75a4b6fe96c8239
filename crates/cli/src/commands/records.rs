// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record lookup and reset commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use hc_adapters::HarvesterApi;
use hc_core::{RepositoryId, UserCommand};
use hc_engine::PollerConfig;
use hc_wire::RecordDetail;

use crate::color;
use crate::commands::harvest;
use crate::exit_error::ExitError;
use crate::output::{handle_list, print_json, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Subcommand)]
pub enum RecordsCommand {
    /// Search records by ip name or OAI identifier
    Find { query: String },
    /// Show one record with its processing errors
    Show { ip_name: String },
    /// Reset one record to pending and show it again
    Reset { ip_name: String },
    /// Reset every failed record of a repository to pending
    BulkReset { repository_id: RepositoryId },
}

pub async fn handle<A: HarvesterApi>(
    command: RecordsCommand,
    api: A,
    poller: PollerConfig,
    format: OutputFormat,
) -> Result<()> {
    match command {
        RecordsCommand::Find { query } => {
            let query = query.trim();
            if query.is_empty() {
                anyhow::bail!("empty search query");
            }
            let hits = api.find_records(query).await.map_err(ExitError::from)?;
            handle_list(format, &hits, "No records found", |items, out| {
                let mut table = Table::new(vec![
                    Column::muted("IP NAME"),
                    Column::left("OAI IDENTIFIER").with_max(48),
                    Column::left("REPOSITORY"),
                    Column::left("STATE"),
                    Column::left("PROCESSED"),
                ]);
                for r in items {
                    table.row(vec![
                        r.ip_name.clone(),
                        r.oai_identifier.clone(),
                        r.repository_id.to_string(),
                        r.state.clone(),
                        r.ts_processed.clone().unwrap_or_else(|| "-".into()),
                    ]);
                }
                table.render(out);
            })?;
        }
        RecordsCommand::Show { ip_name } => {
            let record = api.record(&ip_name).await.map_err(ExitError::from)?;
            print_record(&record, format)?;
        }
        RecordsCommand::Reset { ip_name } => {
            let record = reset_record(api, &ip_name).await?;
            if format == OutputFormat::Text {
                println!("Record {} reset", color::header(&ip_name));
            }
            print_record(&record, format)?;
        }
        RecordsCommand::BulkReset { repository_id } => {
            let command = UserCommand::BulkReset { repository_id: repository_id.clone() };
            harvest::run_guarded(api, poller, command).await?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "reset": repository_id }))?,
                OutputFormat::Text => println!(
                    "Failed records of repository {} reset to pending",
                    color::header(repository_id.as_str())
                ),
            }
        }
    }
    Ok(())
}

/// Reset the record, then fetch it again so the new state is shown.
pub async fn reset_record<A: HarvesterApi>(
    api: A,
    ip_name: &str,
) -> Result<RecordDetail, ExitError> {
    let command = UserCommand::ResetRecord { ip_name: ip_name.to_string() };
    harvest::send(api.clone(), command).await?;
    Ok(api.record(ip_name).await?)
}

fn print_record(record: &RecordDetail, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record)?,
        OutputFormat::Text => print!("{}", render_record(record)),
    }
    Ok(())
}

pub fn render_record(record: &RecordDetail) -> String {
    let r = &record.summary;
    let oai_id = if r.oai_identifier.is_empty() { "-" } else { r.oai_identifier.as_str() };
    let mut lines = vec![
        format!("{} {}", color::header("Record"), r.ip_name),
        format!("  oai id:     {oai_id}"),
        format!("  repository: {}", r.repository_id),
        format!("  state:      {}", r.state),
        format!("  created:    {}", r.ts_create.as_deref().unwrap_or("-")),
        format!("  processed:  {}", r.ts_processed.as_deref().unwrap_or("-")),
    ];
    if let Some(fingerprint) = &record.fingerprint {
        lines.push(format!("  fingerprint: {fingerprint}"));
    }
    if !record.errors.is_empty() {
        lines.push(color::header("Errors"));
        for err in &record.errors {
            let code = err.status_code.map(|c| format!("[{c}] ")).unwrap_or_default();
            lines.push(format!("  {code}{}", err.message));
            if let Some(url) = &err.url {
                lines.push(format!("    {}", color::muted(url)));
            }
        }
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
