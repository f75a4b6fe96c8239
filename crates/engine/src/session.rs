// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring of one client session: runtime task, poller, push bridge.

use crate::dispatcher::ActionDispatcher;
use crate::error::RuntimeError;
use crate::poller::{PollerConfig, StatusPoller};
use crate::runtime::Runtime;
use hc_adapters::{status_bridge, HarvesterApi, PushEndpoint};
use hc_core::{Clock, Intent, RepositoryId, Sequencer};
use hc_storage::StatusView;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the intent channel between producers and the runtime
const INTENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub poller: PollerConfig,
    /// Push channel; polling alone when absent
    pub push: Option<PushEndpoint>,
}

/// A running session. Dropping it without [`Session::shutdown`] leaves the
/// background tasks to wind down when their channels close.
pub struct Session<A, C: Clock> {
    dispatcher: ActionDispatcher<A>,
    view_rx: watch::Receiver<Arc<StatusView>>,
    sequencer: Sequencer<C>,
    push: Option<PushEndpoint>,
    push_task: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl<A: HarvesterApi, C: Clock> Session<A, C> {
    /// Spawn the runtime, the poller, and (when configured) the push bridge.
    pub fn start(api: A, clock: C, config: SessionConfig) -> Self {
        let shutdown = CancellationToken::new();
        let sequencer = Sequencer::new(clock);
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        let (poll_tx, poll_rx) = mpsc::channel(64);

        let (runtime, view_rx) = Runtime::new(intent_rx);
        let runtime_task = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                runtime.run(shutdown).await;
            })
        };

        let poller =
            StatusPoller::new(api.clone(), sequencer.clone(), config.poller, intent_tx.clone());
        let poller_task = tokio::spawn(poller.run(view_rx.clone(), poll_rx, shutdown.clone()));

        let dispatcher = ActionDispatcher::new(api, intent_tx).with_poll_requests(poll_tx);

        let mut session = Self {
            dispatcher,
            view_rx,
            sequencer,
            push: config.push,
            push_task: None,
            shutdown,
            tasks: vec![runtime_task, poller_task],
        };
        session.reconnect();
        session
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<A> {
        &self.dispatcher
    }

    pub fn view(&self) -> watch::Receiver<Arc<StatusView>> {
        self.view_rx.clone()
    }

    /// Latest published view.
    pub fn current(&self) -> Arc<StatusView> {
        Arc::clone(&self.view_rx.borrow())
    }

    /// (Re)start the push bridge if one is configured and not running.
    pub fn reconnect(&mut self) -> bool {
        let Some(endpoint) = self.push.clone() else {
            return false;
        };
        if self.push_task.as_ref().is_some_and(|task| !task.is_finished()) {
            return false;
        }
        tracing::info!(url = %endpoint.url, "starting push channel");
        self.push_task = Some(tokio::spawn(status_bridge(
            endpoint,
            self.sequencer.clone(),
            self.dispatcher_sender(),
            self.shutdown.clone(),
        )));
        true
    }

    /// Stop every task and wait for them.
    pub async fn shutdown(self) -> Result<(), RuntimeError> {
        self.shutdown.cancel();
        for task in self.tasks.into_iter().chain(self.push_task) {
            task.await?;
        }
        Ok(())
    }

    fn dispatcher_sender(&self) -> mpsc::Sender<Intent> {
        self.dispatcher.sender()
    }
}

/// Load the directory, poll every repository once (or just `only`), and
/// return the resulting view. No background tasks outlive the call.
pub async fn snapshot_once<A: HarvesterApi, C: Clock>(
    api: A,
    clock: C,
    config: PollerConfig,
    only: Option<RepositoryId>,
) -> Result<Arc<StatusView>, RuntimeError> {
    let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
    let (runtime, view_rx) = Runtime::new(intent_rx);
    let runtime_task = tokio::spawn(runtime.run(CancellationToken::new()));

    let poller = StatusPoller::new(api, Sequencer::new(clock), config, intent_tx);
    let result = match only {
        Some(id) => {
            poller.load_directory().await?;
            poller.refresh(&id).await
        }
        None => poller.initial_load().await,
    };
    drop(poller);

    runtime_task.await?;
    result?;
    let view = Arc::clone(&view_rx.borrow());
    Ok(view)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
