//! WebSocket handler streaming data frames and fleet events

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wand_core::DataFrame;
use wand_fleet::{ControllerStatus, FleetEvent};

use crate::state::AppState;

/// WebSocket message types
#[derive(Serialize)]
#[serde(tag = "type", content = "data")]
enum WsMessage {
    /// Per-slot status, sent once on connect
    #[serde(rename = "status")]
    Status(Vec<ControllerStatus>),
    /// One published data frame
    #[serde(rename = "frame")]
    Frame(DataFrame),
    /// One fleet event
    #[serde(rename = "event")]
    Event(FleetEvent),
    #[serde(rename = "pong")]
    Pong,
}

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut frames = state.subscribe_frames();
    let mut events = state.subscribe_events();

    info!("WebSocket client connected");

    // Send the current slot status on connect
    if let Some(snapshot) = state.snapshot().await {
        let msg = WsMessage::Status(snapshot);
        if let Ok(json) = serde_json::to_string(&msg) {
            if sender.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
    }

    loop {
        tokio::select! {
            // Forward published frames to the client
            frame = frames.recv() => {
                match frame {
                    Ok(frame) => {
                        let msg = WsMessage::Frame(frame);
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        // Slow consumers skip frames; delivery is
                        // fire-and-forget
                        debug!(skipped = n, "Frame channel lagged");
                    }
                    Err(e) => {
                        debug!(error = %e, "Frame channel closed");
                        break;
                    }
                }
            }

            // Forward fleet events to the client
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let msg = WsMessage::Event(event);
                        if let Ok(json) = serde_json::to_string(&msg) {
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "Event channel lagged");
                    }
                    Err(e) => {
                        debug!(error = %e, "Event channel closed");
                        break;
                    }
                }
            }

            // Handle incoming messages from the client
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) => {
                        // Keepalive for clients without native ping
                        if text.as_str() == "ping" {
                            if let Ok(json) = serde_json::to_string(&WsMessage::Pong) {
                                if sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("WebSocket client disconnected");
}
