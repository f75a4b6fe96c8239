// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status poller: periodic pulls of run-state and record counts.
//!
//! Polling is the consistency backstop for the push channel and the source
//! of the initial load. Repositories that may be stale are polled on the
//! fast interval until a fresh result clears them.

use crate::error::RuntimeError;
use futures_util::future::join_all;
use hc_adapters::{HarvesterApi, TransportError};
use hc_core::{Clock, Intent, RepositoryId, Sequencer, StatusEvent};
use hc_storage::StatusView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Cadence for repositories whose data may be stale
    pub fast_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            fast_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }
}

impl PollerConfig {
    hc_core::setters! {
        set {
            interval: Duration,
            fast_interval: Duration,
            request_timeout: Duration,
        }
    }
}

pub struct StatusPoller<A, C: Clock> {
    api: A,
    sequencer: Sequencer<C>,
    config: PollerConfig,
    intent_tx: mpsc::Sender<Intent>,
}

impl<A: HarvesterApi, C: Clock> StatusPoller<A, C> {
    pub fn new(
        api: A,
        sequencer: Sequencer<C>,
        config: PollerConfig,
        intent_tx: mpsc::Sender<Intent>,
    ) -> Self {
        Self { api, sequencer, config, intent_tx }
    }

    /// Fetch run-state and record counts for one repository.
    ///
    /// Events carry the response's own marker, or the marker taken when the
    /// request was issued.
    pub async fn poll(&self, id: &RepositoryId) -> Result<Vec<StatusEvent>, TransportError> {
        let requested_at = self.sequencer.next();
        let fetch = async {
            tokio::try_join!(self.api.run_state(id), self.api.record_status(id))
        };
        let (run_state, counts) = tokio::time::timeout(self.config.request_timeout, fetch)
            .await
            .map_err(|_| TransportError::Timeout(self.config.request_timeout))??;

        Ok(vec![
            run_state.into_event(id.clone(), requested_at),
            counts.into_event(id.clone(), requested_at),
        ])
    }

    /// Poll one repository and dispatch the outcome.
    ///
    /// Transport failures become [`Intent::PollFailed`]; only a stopped
    /// runtime is an error here.
    pub async fn refresh(&self, id: &RepositoryId) -> Result<(), RuntimeError> {
        match self.poll(id).await {
            Ok(events) => {
                for event in events {
                    self.dispatch(Intent::Status { event }).await?;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(repository = %id, error = %e, "poll failed");
                self.dispatch(Intent::PollFailed { repository_id: id.clone(), error: e.to_string() })
                    .await
            }
        }
    }

    pub async fn refresh_all(&self, ids: Vec<RepositoryId>) -> Result<(), RuntimeError> {
        if ids.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = ids.len(), "polling repositories");
        join_all(ids.iter().map(|id| self.refresh(id))).await.into_iter().collect()
    }

    /// Replace the directory with the backend's repository list.
    pub async fn load_directory(&self) -> Result<Vec<RepositoryId>, RuntimeError> {
        let repositories = tokio::time::timeout(self.config.request_timeout, self.api.list_repositories())
            .await
            .map_err(|_| TransportError::Timeout(self.config.request_timeout))??;
        let ids = repositories.iter().map(|r| r.id.clone()).collect();
        tracing::info!(count = repositories.len(), "repository directory loaded");
        self.dispatch(Intent::DirectoryLoaded { repositories }).await?;
        Ok(ids)
    }

    /// Load the directory, then poll every repository in it.
    pub async fn initial_load(&self) -> Result<(), RuntimeError> {
        let ids = self.load_directory().await?;
        self.refresh_all(ids).await
    }

    /// Poll on the configured cadence until `shutdown` fires.
    ///
    /// `view_rx` decides which repositories to poll; `demand_rx` carries
    /// on-demand requests from the dispatcher.
    pub async fn run(
        self,
        view_rx: watch::Receiver<Arc<StatusView>>,
        mut demand_rx: mpsc::Receiver<RepositoryId>,
        shutdown: CancellationToken,
    ) {
        let mut loaded = match self.initial_load().await {
            Ok(()) => true,
            Err(RuntimeError::Stopped) => return,
            Err(e) => {
                tracing::warn!(error = %e, "initial load failed, retrying on next poll");
                false
            }
        };

        let mut slow = tokio::time::interval(self.config.interval);
        slow.set_missed_tick_behavior(MissedTickBehavior::Delay);
        slow.tick().await;
        let mut fast = tokio::time::interval(self.config.fast_interval);
        fast.set_missed_tick_behavior(MissedTickBehavior::Delay);
        fast.tick().await;

        loop {
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = slow.tick() => {
                    if loaded {
                        let ids = view_rx.borrow().ids().cloned().collect();
                        self.refresh_all(ids).await
                    } else {
                        match self.initial_load().await {
                            Ok(()) => {
                                loaded = true;
                                Ok(())
                            }
                            Err(RuntimeError::Transport(e)) => {
                                tracing::warn!(error = %e, "directory load failed");
                                Ok(())
                            }
                            Err(e) => Err(e),
                        }
                    }
                }
                _ = fast.tick() => {
                    let ids = view_rx.borrow().stale_ids().cloned().collect();
                    self.refresh_all(ids).await
                }
                Some(id) = demand_rx.recv() => self.refresh(&id).await,
            };
            if let Err(e) = result {
                tracing::info!(error = %e, "poller stopping");
                break;
            }
        }
    }

    async fn dispatch(&self, intent: Intent) -> Result<(), RuntimeError> {
        self.intent_tx.send(intent).await.map_err(|_| RuntimeError::Stopped)
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
