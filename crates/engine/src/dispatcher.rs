// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action dispatcher: the single intake for intents.
//!
//! Push frames, poll results, and user commands all pass through here on
//! their way to the runtime task. User commands additionally start a backend
//! call in the background; its outcome comes back later as another intent.

use crate::error::RuntimeError;
use hc_adapters::{HarvesterApi, TransportError};
use hc_core::{CommandFailure, Intent, RepositoryId, UserCommand};
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct ActionDispatcher<A> {
    api: A,
    intent_tx: mpsc::Sender<Intent>,
    /// On-demand poll requests for the poller
    poll_tx: Option<mpsc::Sender<RepositoryId>>,
}

impl<A: HarvesterApi> ActionDispatcher<A> {
    pub fn new(api: A, intent_tx: mpsc::Sender<Intent>) -> Self {
        Self { api, intent_tx, poll_tx: None }
    }

    /// Ask the poller to refresh a repository after its commands succeed.
    pub fn with_poll_requests(mut self, poll_tx: mpsc::Sender<RepositoryId>) -> Self {
        self.poll_tx = Some(poll_tx);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<Intent> {
        self.intent_tx.clone()
    }

    /// Forward an intent to the runtime. Safe to call from many tasks;
    /// intents from one caller arrive in the order they were sent.
    pub async fn dispatch(&self, intent: Intent) -> Result<(), RuntimeError> {
        self.intent_tx.send(intent).await.map_err(|_| RuntimeError::Stopped)
    }

    /// Record the command, then run its backend call in the background.
    pub async fn submit(&self, command: UserCommand) -> Result<(), RuntimeError> {
        tracing::info!(%command, "submitting command");
        self.dispatch(Intent::Command { command: command.clone() }).await?;

        let this = self.clone();
        tokio::spawn(async move {
            let result = this.execute(&command).await;
            this.settle(command, result).await;
        });
        Ok(())
    }

    /// Record the command and wait for its backend call.
    ///
    /// Follow-up intents are dispatched exactly as for [`Self::submit`].
    pub async fn submit_and_wait(&self, command: UserCommand) -> Result<(), RuntimeError> {
        self.dispatch(Intent::Command { command: command.clone() }).await?;
        let result = self.execute(&command).await;
        let failed = result.as_ref().err().map(ToString::to_string);
        self.settle(command.clone(), result).await;
        match failed {
            Some(error) => Err(RuntimeError::CommandFailed(CommandFailure { command, error })),
            None => Ok(()),
        }
    }

    /// Perform the backend call for a command.
    pub async fn execute(&self, command: &UserCommand) -> Result<(), TransportError> {
        match command {
            UserCommand::Start { repository_id } => self.api.start_harvest(repository_id).await,
            UserCommand::Stop { repository_id } => self.api.interrupt_harvest(repository_id).await,
            UserCommand::Enable { repository_id } => {
                self.api.set_enabled(repository_id, true).await
            }
            UserCommand::Disable { repository_id } => {
                self.api.set_enabled(repository_id, false).await
            }
            UserCommand::BulkReset { repository_id } => self.api.bulk_reset(repository_id).await,
            UserCommand::ResetRecord { ip_name } => self.api.reset_record(ip_name).await,
        }
    }

    /// Turn the outcome of a backend call into follow-up intents.
    async fn settle(&self, command: UserCommand, result: Result<(), TransportError>) {
        match result {
            Ok(()) => {
                tracing::info!(%command, "command accepted by backend");
                if matches!(command, UserCommand::Enable { .. } | UserCommand::Disable { .. }) {
                    self.refresh_repository(&command).await;
                }
                if let (Some(id), Some(poll_tx)) = (command.repository_id(), &self.poll_tx) {
                    // Poller busy: the next scheduled round picks it up.
                    let _ = poll_tx.try_send(id.clone());
                }
            }
            Err(e) => {
                tracing::warn!(%command, error = %e, "command failed");
                let failure = CommandFailure { command, error: e.to_string() };
                if self.dispatch(Intent::CommandFailed { failure }).await.is_err() {
                    tracing::debug!("runtime gone, dropping command failure");
                }
            }
        }
    }

    async fn refresh_repository(&self, command: &UserCommand) {
        let Some(id) = command.repository_id() else {
            return;
        };
        match self.api.get_repository(id).await {
            Ok(repository) => {
                let _ = self.dispatch(Intent::RepositoryUpserted { repository }).await;
            }
            Err(e) => {
                tracing::warn!(repository = %id, error = %e, "refetch after toggle failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
