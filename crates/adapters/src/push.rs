// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel bridge: subscribes to the backend's status socket and
//! forwards decoded frames as intents.
//!
//! The bridge never touches snapshot state. When the connection goes away
//! it emits one connection-wide `SocketClosed` and exits; reconnecting is
//! up to the caller.

use crate::credential::Credential;
use crate::http::TransportError;
use futures_util::StreamExt;
use hc_core::{Clock, Intent, Sequencer, StatusEvent};
use hc_wire::{decode_push, Decoded};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type PushStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Where to subscribe and with which credential.
#[derive(Debug, Clone)]
pub struct PushEndpoint {
    /// `ws://host:port/status-socket`
    pub url: String,
    pub credential: Credential,
}

impl PushEndpoint {
    pub fn new(url: impl Into<String>, credential: Credential) -> Self {
        Self { url: url.into(), credential }
    }

    /// Default socket location next to an HTTP base address.
    pub fn for_backend(addr: &str, credential: Credential) -> Self {
        Self::new(format!("ws://{addr}/status-socket"), credential)
    }
}

/// Translate one text frame into the intent the dispatcher should see.
pub fn frame_intent<C: Clock>(text: &str, sequencer: &Sequencer<C>) -> Intent {
    match decode_push(text, || sequencer.next()) {
        Ok(Decoded::Event(event)) => Intent::Status { event },
        Ok(Decoded::Fetcher { state, sequence }) => Intent::FetcherStateChanged { state, sequence },
        Ok(Decoded::Unrecognized(tag)) => Intent::Unrecognized { tag },
        Err(e) => Intent::Malformed { reason: e.to_string() },
    }
}

/// Run the bridge until the socket closes or `shutdown` fires.
pub async fn status_bridge<C: Clock>(
    endpoint: PushEndpoint,
    sequencer: Sequencer<C>,
    intent_tx: mpsc::Sender<Intent>,
    shutdown: CancellationToken,
) {
    let stream = tokio::select! {
        stream = connect(&endpoint) => stream,
        _ = shutdown.cancelled() => return,
    };
    let stream = match stream {
        Ok(s) => {
            tracing::info!(url = %endpoint.url, "push channel connected");
            s
        }
        Err(e) => {
            tracing::warn!(url = %endpoint.url, error = %e, "push channel: connect failed");
            emit_closed(&intent_tx, &sequencer).await;
            return;
        }
    };

    let (_write, mut read) = stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let intent = frame_intent(&text, &sequencer);
                        tracing::trace!(intent = intent.name(), "push channel frame");
                        if intent_tx.send(intent).await.is_err() {
                            // Dispatcher is gone; nobody is listening.
                            break;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(?frame, "push channel: received close frame");
                        emit_closed(&intent_tx, &sequencer).await;
                        break;
                    }
                    None => {
                        tracing::info!("push channel: stream ended");
                        emit_closed(&intent_tx, &sequencer).await;
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "push channel: read error");
                        emit_closed(&intent_tx, &sequencer).await;
                        break;
                    }
                    _ => {} // Ping/Pong/Binary: ignore
                }
            }
            _ = shutdown.cancelled() => {
                break;
            }
        }
    }
}

async fn emit_closed<C: Clock>(intent_tx: &mpsc::Sender<Intent>, sequencer: &Sequencer<C>) {
    let event = StatusEvent::SocketClosed { repository_id: None, sequence: sequencer.next() };
    let _ = intent_tx.send(Intent::Status { event }).await;
}

async fn connect(endpoint: &PushEndpoint) -> Result<PushStream, TransportError> {
    let mut request = endpoint
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| TransportError::WebSocket(e.to_string()))?;
    let auth = HeaderValue::from_str(&endpoint.credential.header_value())
        .map_err(|e| TransportError::WebSocket(e.to_string()))?;
    request.headers_mut().insert("Authorization", auth);

    let (stream, _) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|e| TransportError::WebSocket(e.to_string()))?;
    Ok(stream)
}

#[cfg(test)]
#[path = "push_tests.rs"]
mod tests;
