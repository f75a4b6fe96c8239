// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository directory commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use hc_adapters::HarvesterApi;
use hc_core::{Repository, RepositoryId, Schedule};
use hc_wire::RepositoryForm;

use crate::color;
use crate::exit_error::{self, ExitError};
use crate::output::{format_datestamp, handle_list, print_json, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct RepoArgs {
    #[command(subcommand)]
    pub command: RepoCommand,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FormArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,
    /// OAI-PMH endpoint URL
    #[arg(long)]
    pub url: Option<String>,
    /// OAI-PMH metadata prefix (e.g. nl_didl)
    #[arg(long)]
    pub metadata_prefix: Option<String>,
    /// OAI-PMH set to restrict the harvest to
    #[arg(long)]
    pub set: Option<String>,
    /// daily, weekly, monthly, or once
    #[arg(long)]
    pub schedule: Option<Schedule>,
}

impl FormArgs {
    /// Overlay the given flags on `form`.
    pub fn apply(self, mut form: RepositoryForm) -> RepositoryForm {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(url) = self.url {
            form.url = url;
        }
        if let Some(prefix) = self.metadata_prefix {
            form.metadata_prefix = prefix;
        }
        if let Some(set) = self.set {
            form.set = set;
        }
        if let Some(schedule) = self.schedule {
            form.schedule = schedule;
        }
        form
    }
}

#[derive(Subcommand)]
pub enum RepoCommand {
    /// List configured repositories
    List {},
    /// Show one repository's harvest definition
    Show { id: RepositoryId },
    /// Register a new repository (created disabled)
    Add {
        #[command(flatten)]
        form: FormArgs,
    },
    /// Change a repository's harvest definition (repository must be disabled)
    Edit {
        id: RepositoryId,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Remove a repository (repository must be disabled)
    Rm { id: RepositoryId },
}

pub async fn handle<A: HarvesterApi>(
    command: RepoCommand,
    api: &A,
    format: OutputFormat,
) -> Result<()> {
    match command {
        RepoCommand::List {} => {
            let mut repositories = api.list_repositories().await.map_err(ExitError::from)?;
            repositories.sort_by(|a, b| a.id.cmp(&b.id));
            handle_list(format, &repositories, "No repositories", |items, out| {
                let mut table = Table::new(vec![
                    Column::muted("ID"),
                    Column::left("NAME").with_max(24),
                    Column::left("URL").with_max(48),
                    Column::left("PREFIX"),
                    Column::left("SET").with_max(16),
                    Column::left("SCHEDULE"),
                    Column::left("ENABLED"),
                ]);
                for r in items {
                    table.row(vec![
                        r.id.to_string(),
                        r.name.clone(),
                        r.url.clone(),
                        r.metadata_prefix.clone(),
                        r.set.clone(),
                        r.schedule.label().to_string(),
                        if r.enabled { "yes" } else { "no" }.to_string(),
                    ]);
                }
                table.render(out);
            })?;
        }
        RepoCommand::Show { id } => {
            let repository = api.get_repository(&id).await.map_err(ExitError::from)?;
            match format {
                OutputFormat::Json => print_json(&repository)?,
                OutputFormat::Text => print!("{}", render_repository(&repository)),
            }
        }
        RepoCommand::Add { form } => {
            let form = validated(form.apply(empty_form()))?;
            let created = api.create_repository(&form).await.map_err(ExitError::from)?;
            match format {
                OutputFormat::Json => print_json(&created)?,
                OutputFormat::Text => println!(
                    "Repository {} added ({}); enable it with `hc enable {}`",
                    color::header(created.id.as_str()),
                    created.name,
                    created.id
                ),
            }
        }
        RepoCommand::Edit { id, form } => {
            let current = editable(api, &id, "edit").await?;
            let form = validated(form.apply(RepositoryForm::from_repository(&current)))?;
            api.update_repository(&id, &form).await.map_err(ExitError::from)?;
            let updated = api.get_repository(&id).await.map_err(ExitError::from)?;
            match format {
                OutputFormat::Json => print_json(&updated)?,
                OutputFormat::Text => println!("Repository {} updated", color::header(id.as_str())),
            }
        }
        RepoCommand::Rm { id } => {
            editable(api, &id, "remove").await?;
            api.delete_repository(&id).await.map_err(ExitError::from)?;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "removed": id }))?,
                OutputFormat::Text => println!("Repository {} removed", color::header(id.as_str())),
            }
        }
    }
    Ok(())
}

fn empty_form() -> RepositoryForm {
    RepositoryForm {
        name: String::new(),
        url: String::new(),
        metadata_prefix: String::new(),
        set: String::new(),
        schedule: Schedule::default(),
    }
}

fn validated(form: RepositoryForm) -> Result<RepositoryForm, ExitError> {
    let missing = form.missing_fields();
    if missing.is_empty() {
        Ok(form)
    } else {
        let message = format!("missing required fields: {}", missing.join(", "));
        Err(ExitError::new(exit_error::FAILURE, message))
    }
}

/// Fetch the repository and refuse to change it while it is enabled.
async fn editable<A: HarvesterApi>(
    api: &A,
    id: &RepositoryId,
    verb: &str,
) -> Result<Repository, ExitError> {
    let repository = api.get_repository(id).await?;
    if repository.enabled {
        return Err(ExitError::not_allowed(format!(
            "repository {id} is enabled; disable it before you {verb} it (hc disable {id})"
        )));
    }
    Ok(repository)
}

pub fn render_repository(r: &Repository) -> String {
    let fields = [
        ("name", r.name.clone()),
        ("url", r.url.clone()),
        ("prefix", r.metadata_prefix.clone()),
        ("set", if r.set.is_empty() { "-".to_string() } else { r.set.clone() }),
        ("schedule", r.schedule.label().to_string()),
        ("enabled", if r.enabled { "yes" } else { "no" }.to_string()),
        ("harvested", format_datestamp(r.date_stamp.as_deref())),
    ];
    let mut text = format!("{} {}\n", color::header("Repository"), r.id);
    for (label, value) in fields {
        text.push_str(&format!("  {:<11} {}\n", format!("{label}:"), value));
    }
    text
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
