//! WebSocket handlers.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{info, warn};

use gigwork_models::{UserId, WsMessage, WsSubscribeRequest};

use crate::metrics;
use crate::state::AppState;

/// WebSocket notifications endpoint.
pub async fn ws_notifications(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_notification_socket(socket, state))
}

/// Handle a notification WebSocket connection.
async fn handle_notification_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // First frame is the subscribe handshake.
    let request: WsSubscribeRequest = match receiver.next().await {
        Some(Ok(Message::Text(text))) => match serde_json::from_str(&text) {
            Ok(req) => req,
            Err(e) => {
                let error = WsMessage::error(format!("Invalid request: {}", e));
                let _ = sender.send(Message::Text(serde_json::to_string(&error).unwrap())).await;
                return;
            }
        },
        _ => {
            let error = WsMessage::error("Expected JSON message");
            let _ = sender.send(Message::Text(serde_json::to_string(&error).unwrap())).await;
            return;
        }
    };

    // Verify token
    let claims = match state.verifier.verify_token(&request.token) {
        Ok(c) => c,
        Err(e) => {
            let error = WsMessage::error(format!("Authentication failed: {}", e));
            let _ = sender.send(Message::Text(serde_json::to_string(&error).unwrap())).await;
            return;
        }
    };

    let user_id = UserId::from(claims.uid());
    metrics::record_ws_connected();
    info!("Notification socket opened for user {}", user_id);

    let mut updates = state.hub.subscribe(&user_id).await;

    let ack = WsMessage::subscribed(user_id.clone());
    if sender
        .send(Message::Text(serde_json::to_string(&ack).unwrap()))
        .await
        .is_err()
    {
        state.hub.unsubscribe(&user_id).await;
        metrics::record_ws_disconnected();
        return;
    }

    // Forward hub messages until either side closes.
    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Ok(msg) => {
                    let json = match serde_json::to_string(&msg) {
                        Ok(j) => j,
                        Err(_) => continue,
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        warn!("WebSocket send failed, client disconnected");
                        break;
                    }
                    metrics::record_ws_message_sent(msg.message_type().as_str());
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Notification subscriber for {} lagged, {} messages dropped",
                        user_id, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            frame = receiver.next() => match frame {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(_)) => break,
                Some(Ok(_)) => {} // ignore pings and stray frames
            },
        }
    }

    state.hub.unsubscribe(&user_id).await;
    metrics::record_ws_disconnected();
    info!("Notification socket closed for user {}", user_id);
}
