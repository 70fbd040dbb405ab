//! WebSocket upgrade handler for booking payment connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Assign a connection id and register it with the gateway
//! 2. Forward outbound frames queued by the registry to the socket
//! 3. Parse client frames into booking commands
//! 4. Funnel every way of ending into `handle_disconnect`

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;

use crate::application::booking_session::BookingSessionGateway;
use crate::domain::foundation::ConnectionId;
use crate::ports::OutboundFrame;

use super::messages::{encode_event, ClientMessage};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub gateway: Arc<BookingSessionGateway>,
}

impl WebSocketState {
    pub fn new(gateway: Arc<BookingSessionGateway>) -> Self {
        Self { gateway }
    }
}

/// Query parameters accepted on connect.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub reservation_id: Option<String>,
    pub locale: Option<String>,
}

/// Handle WebSocket upgrade requests for the booking channel.
///
/// Route: `GET /bookings/live?reservationId=..&locale=..`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<WebSocketState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, params, state))
}

/// Route: `GET /health`
pub async fn health_handler(State(state): State<WebSocketState>) -> impl IntoResponse {
    let connections = state.gateway.registry().connection_count().await;
    Json(json!({ "status": "ok", "connections": connections }))
}

/// Runs for the lifetime of one connection.
async fn handle_socket(socket: WebSocket, params: ConnectParams, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = ConnectionId::generate();
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundFrame>();

    state
        .gateway
        .handle_connection(connection_id.clone(), tx, params.reservation_id, params.locale)
        .await;

    // Ends when the registry closes the connection or drops its sender.
    let mut send_task = {
        let connection_id = connection_id.clone();
        tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                match frame {
                    OutboundFrame::Event(event) => {
                        let text = match encode_event(&event) {
                            Ok(text) => text,
                            Err(e) => {
                                tracing::error!(
                                    connection_id = %connection_id,
                                    "Failed to encode event: {}",
                                    e
                                );
                                continue;
                            }
                        };
                        if let Err(e) = sender.send(Message::Text(text)).await {
                            tracing::debug!(
                                connection_id = %connection_id,
                                "Send error, closing connection: {}",
                                e
                            );
                            break;
                        }
                    }
                    OutboundFrame::Close => {
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
        })
    };

    let mut recv_task = {
        let connection_id = connection_id.clone();
        let gateway = state.gateway.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => match ClientMessage::parse(&text) {
                        Ok(msg) => gateway.handle_command(&connection_id, msg.into()).await,
                        Err(e) => {
                            tracing::warn!(
                                connection_id = %connection_id,
                                "Ignoring malformed client frame: {}",
                                e
                            );
                        }
                    },
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(
                            connection_id = %connection_id,
                            "Received unsupported binary message"
                        );
                    }
                    // Protocol-level ping/pong is answered by axum.
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.gateway.handle_disconnect(&connection_id).await;
}

/// Create the axum router for the booking channel and health probe.
pub fn booking_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new()
        .route("/bookings/live", get(ws_handler))
        .route("/health", get(health_handler))
}
