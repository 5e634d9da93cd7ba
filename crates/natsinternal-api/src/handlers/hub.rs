//! Notification hub WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};

use natsinternal_core::types::UserId;
use natsinternal_realtime::OutboundMessage;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for hub authentication.
#[derive(Debug, Deserialize)]
pub struct HubQuery {
    /// Access token.
    pub access_token: String,
}

/// GET /hubs/notifications?access_token={jwt}: WebSocket upgrade
pub async fn notification_hub(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<HubQuery>,
) -> Result<Response, ApiError> {
    let claims = state.jwt_decoder.decode(&query.access_token)?;
    let user_id = claims.user_id()?;

    Ok(ws.on_upgrade(move |socket| handle_hub_connection(state, user_id, claims.name, socket)))
}

/// Runs an established hub connection until either side closes it.
async fn handle_hub_connection(
    state: AppState,
    user_id: UserId,
    user_name: String,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let connections = state.realtime.connections.clone();
    let mut shutdown = state.realtime.shutdown_receiver();

    let (handle, mut outbound_rx) = connections.register(user_id, user_name);
    let conn_id = handle.id;

    if let Ok(frame) = serde_json::to_string(&OutboundMessage::Connected {
        connection_id: conn_id,
        user_id,
    }) {
        let _ = handle.send(frame);
    }
    // The pool owns the sender from here on; eviction ends the outbound task.
    drop(handle);

    let outbound_task = tokio::spawn(async move {
        while let Some(frame) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    loop {
        tokio::select! {
            next = ws_rx.next() => match next {
                Some(Ok(Message::Text(text))) => {
                    connections.handle_inbound(&conn_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "Hub socket error");
                    break;
                }
            },
            _ = shutdown.recv() => break,
        }
    }

    outbound_task.abort();
    connections.unregister(&conn_id);

    info!(
        conn_id = %conn_id,
        user_id = %user_id,
        "Hub connection closed"
    );
}
