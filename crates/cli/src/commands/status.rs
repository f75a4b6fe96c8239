// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hc status`: one poll round, printed.

use anyhow::Result;
use hc_adapters::HarvesterApi;
use hc_core::{RecordStage, RepositoryId, SystemClock};
use hc_engine::{snapshot_once, PollerConfig};
use hc_storage::{Connectivity, RepositoryView, StatusView};

use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_datestamp, format_epoch_ms, print_json, OutputFormat};
use crate::table::{Column, Table};

pub async fn handle<A: HarvesterApi>(
    api: A,
    poller: PollerConfig,
    id: Option<RepositoryId>,
    format: OutputFormat,
) -> Result<()> {
    let view =
        snapshot_once(api, SystemClock, poller, id.clone()).await.map_err(ExitError::from)?;
    match id {
        Some(id) => {
            let repo = view
                .get(&id)
                .filter(|r| r.repository.is_some())
                .ok_or_else(|| ExitError::not_found(format!("repository {id} not found")))?;
            match format {
                OutputFormat::Json => print_json(repo)?,
                OutputFormat::Text => print!("{}", render_detail(repo)),
            }
        }
        None => match format {
            OutputFormat::Json => print_json(view.as_ref())?,
            OutputFormat::Text if view.repositories.is_empty() => println!("No repositories"),
            OutputFormat::Text => print!("{}", render_table(&view)),
        },
    }
    Ok(())
}

/// The repositories table with a footer naming stale rows.
pub fn render_table(view: &StatusView) -> String {
    let mut columns = vec![
        Column::muted("ID"),
        Column::left("NAME").with_max(24),
        Column::status("STATE"),
    ];
    columns.extend(STAGE_COLUMNS.iter().map(|&(header, _)| Column::right(header)));
    columns.extend([
        Column::left("LAST HARVEST"),
        Column::left("SCHEDULE"),
        Column::left("ENABLED"),
        Column::left("NOTES").with_max(60),
    ]);

    let mut table = Table::new(columns);
    for repo in &view.repositories {
        let mut cells = vec![
            repo.repository_id.to_string(),
            repo.repository.as_ref().map(|r| r.name.clone()).unwrap_or_else(|| "-".into()),
            repo.run_state().to_string(),
        ];
        cells.extend(
            STAGE_COLUMNS.iter().map(|(_, stage)| repo.snapshot.counts.get(stage).to_string()),
        );
        cells.extend([
            repo.repository
                .as_ref()
                .map(|r| format_datestamp(r.date_stamp.as_deref()))
                .unwrap_or_else(|| "-".into()),
            repo.repository.as_ref().map(|r| r.schedule.label().to_string()).unwrap_or_default(),
            match &repo.repository {
                Some(r) if r.enabled => "yes".into(),
                Some(_) => "no".into(),
                None => "-".into(),
            },
            notes(repo).join("; "),
        ]);
        table.row(cells);
    }

    let mut text = table.to_text();
    let stale: Vec<&str> = view.stale_ids().map(|id| id.as_str()).collect();
    if !stale.is_empty() {
        text.push_str(&color::warn(&format!("data may be stale for: {}", stale.join(", "))));
        text.push('\n');
    }
    if let Some(line) = fetcher_line(view) {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// The global record fetcher, once the push channel has reported it.
pub fn fetcher_line(view: &StatusView) -> Option<String> {
    let fetcher = view.fetcher?;
    let mut line = format!("record fetcher: {}", color::status(&fetcher.state.to_string()));
    if fetcher.may_be_stale() {
        line.push_str(&color::warn(" (push disconnected)"));
    }
    Some(line)
}

const STAGE_COLUMNS: [(&str, RecordStage); 5] = [
    ("PENDING", RecordStage::Pending),
    ("PROCESSING", RecordStage::Processing),
    ("FAILURE", RecordStage::Failure),
    ("PROCESSED", RecordStage::Processed),
    ("PREPROCESSING", RecordStage::InPreprocessing),
];

/// Short remarks about anything unusual on the row.
pub fn notes(repo: &RepositoryView) -> Vec<String> {
    let snap = &repo.snapshot;
    let mut notes = Vec::new();
    if let Connectivity::Stale { .. } = snap.connectivity {
        notes.push("push disconnected".to_string());
    }
    if let Some(err) = &snap.poll_error {
        notes.push(format!("poll failed: {err}"));
    }
    if let Some(failure) = &snap.command_failure {
        notes.push(failure.message());
    }
    if let Some(unexpected) = &snap.unexpected {
        notes.push(unexpected.to_string());
    }
    if snap.reset_pending {
        notes.push("reset requested".to_string());
    }
    if let Some(err) = &snap.last_error {
        notes.push(format!("error: {err}"));
    }
    notes
}

/// Everything known about one repository, one field per line.
pub fn render_detail(repo: &RepositoryView) -> String {
    let mut lines = vec![format!("{} {}", color::header("Repository"), repo.repository_id)];
    if let Some(r) = &repo.repository {
        lines.push(format!("  name:        {}", r.name));
        lines.push(format!("  url:         {}", r.url));
        lines.push(format!("  prefix:      {}", r.metadata_prefix));
        if !r.set.is_empty() {
            lines.push(format!("  set:         {}", r.set));
        }
        lines.push(format!("  schedule:    {}", r.schedule.label()));
        lines.push(format!("  enabled:     {}", if r.enabled { "yes" } else { "no" }));
        lines.push(format!("  harvested:   {}", format_datestamp(r.date_stamp.as_deref())));
    }
    lines.push(format!("  state:       {}", color::status(&repo.run_state().to_string())));
    lines.push(format!("  updated:     {}", format_epoch_ms(repo.snapshot.last_updated_at.value())));

    lines.push(color::header("Records"));
    let counts = &repo.snapshot.counts;
    let extra = counts.stages().filter(|s| !RecordStage::KNOWN.contains(s));
    for stage in RecordStage::KNOWN.iter().chain(extra) {
        lines.push(format!("  {:<14} {}", format!("{stage}:"), counts.get(stage)));
    }

    let notes = notes(repo);
    if !notes.is_empty() {
        lines.push(color::header("Notes"));
        lines.extend(notes.iter().map(|n| format!("  {}", color::warn(n))));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
