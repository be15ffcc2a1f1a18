//! Live watch websocket
//!
//! Each connection owns one [`WatchRegistry`]. Client frames are JSON
//! [`WatchCommand`]s; the server pushes `snapshot` and `failed` deliveries
//! for watched containers, plus `error` frames for rejected commands.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use folio_common::AppError;
use folio_core::Identity;
use folio_service::dto::WatchCommand;
use folio_service::{WatchEvents, WatchRegistry};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::extractors::MaybeAuthUser;
use crate::state::AppState;

/// Buffer for server-side error frames
const CONTROL_BUFFER_SIZE: usize = 16;

/// Frames produced by the connection itself rather than by a watch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlFrame {
    Error { code: String, message: String },
}

impl ControlFrame {
    fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Upgrade to the watch protocol. A bearer token on the upgrade request
/// sets the initial viewer; `identify` can change it later.
///
/// GET /watch
pub async fn watch_handler(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket, viewer))
}

async fn handle_socket(state: AppState, socket: WebSocket, viewer: Option<Identity>) {
    let (registry, events) = WatchRegistry::new(state.service_context().clone(), viewer);
    let (control_tx, control_rx) = mpsc::channel::<ControlFrame>(CONTROL_BUFFER_SIZE);
    let (ws_sink, mut ws_stream) = socket.split();

    tracing::info!("Watch connection established");

    let mut recv_task = tokio::spawn(async move {
        let mut registry = registry;
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(frame) = handle_command(&state, &mut registry, &text) {
                        if control_tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                }
                Ok(Message::Binary(_)) => {
                    let frame = ControlFrame::error(
                        "UNSUPPORTED_FRAME",
                        "Binary frames are not supported",
                    );
                    if control_tx.send(frame).await.is_err() {
                        break;
                    }
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Ok(Message::Close(_)) => {
                    tracing::debug!("Client closed watch connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Watch websocket error");
                    break;
                }
            }
        }
        registry.dispose();
    });

    let mut send_task = tokio::spawn(forward_frames(ws_sink, events, control_rx));

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    }

    tracing::info!("Watch connection closed");
}

/// Apply one client frame to the registry
fn handle_command(
    state: &AppState,
    registry: &mut WatchRegistry,
    text: &str,
) -> Result<(), ControlFrame> {
    let command: WatchCommand = serde_json::from_str(text)
        .map_err(|e| ControlFrame::error("INVALID_COMMAND", e.to_string()))?;

    match command {
        WatchCommand::Watch {
            container,
            topic,
            target,
        } => {
            registry.watch(container, topic.topic(target));
        }
        WatchCommand::Unwatch { container } => {
            if !registry.unwatch(&container) {
                return Err(ControlFrame::error(
                    "UNKNOWN_CONTAINER",
                    format!("Container is not watched: {container}"),
                ));
            }
        }
        WatchCommand::Expand {
            container,
            expanded,
        } => {
            if !registry.set_expanded(&container, expanded) {
                return Err(ControlFrame::error(
                    "UNKNOWN_CONTAINER",
                    format!("Container is not watched: {container}"),
                ));
            }
        }
        WatchCommand::Identify { token: None } => registry.identify(None),
        WatchCommand::Identify { token: Some(token) } => {
            // A rejected token keeps the current viewer
            let identity = state.identity().verify(&token).map_err(|e| {
                let err = AppError::from(e);
                ControlFrame::error(err.error_code(), err.to_string())
            })?;
            registry.identify(Some(identity));
        }
    }
    Ok(())
}

async fn forward_frames<S>(
    mut ws_sink: S,
    mut events: WatchEvents,
    mut control_rx: mpsc::Receiver<ControlFrame>,
) where
    S: futures_util::Sink<Message> + Unpin,
{
    loop {
        let json = tokio::select! {
            Some(event) = events.recv() => serde_json::to_string(&event),
            Some(frame) = control_rx.recv() => serde_json::to_string(&frame),
            else => break,
        };

        let json = match json {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize watch frame");
                continue;
            }
        };

        if ws_sink.send(Message::Text(json)).await.is_err() {
            tracing::debug!("Watch client went away");
            break;
        }
    }

    let _ = ws_sink.close().await;
}
