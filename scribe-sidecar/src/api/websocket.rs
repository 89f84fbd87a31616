use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use super::state::AppState;
use crate::models::Action;

#[derive(Debug, Deserialize)]
struct WsIncoming {
    #[serde(rename = "type")]
    msg_type: String,
}

#[derive(Debug, Serialize)]
struct WsOutgoing {
    #[serde(rename = "type")]
    msg_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<u64>,
}

impl WsOutgoing {
    fn action(action: Action) -> Self {
        Self {
            msg_type: "action".to_string(),
            action: Some(action),
            skipped: None,
        }
    }

    fn lagged(skipped: u64) -> Self {
        Self {
            msg_type: "lagged".to_string(),
            action: None,
            skipped: Some(skipped),
        }
    }

    fn pong() -> Self {
        Self {
            msg_type: "pong".to_string(),
            action: None,
            skipped: None,
        }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(client_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::info!("WebSocket connection request from client: {}", client_id);
    ws.on_upgrade(move |socket| handle_socket(socket, client_id, state))
}

/// Streams every recorded action to the client as it is accepted into the
/// session. Clients may send `{"type":"ping"}` and get a pong back.
async fn handle_socket(socket: WebSocket, client_id: String, state: Arc<AppState>) {
    tracing::info!("WebSocket connected: {}", client_id);
    state.client_connected(&client_id);

    let (mut sender, mut receiver) = socket.split();
    let mut actions = state.controller.subscribe();
    let (pong_tx, mut pong_rx) = mpsc::unbounded_channel::<()>();

    // Task to forward recorded actions (and pongs) to this client
    let send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                received = actions.recv() => match received {
                    Ok(action) => WsOutgoing::action(action),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("WebSocket client lagged, {} actions skipped", skipped);
                        WsOutgoing::lagged(skipped)
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                Some(()) = pong_rx.recv() => WsOutgoing::pong(),
            };

            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(_) => continue,
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Task to handle incoming messages (ping/pong)
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Ok(incoming) = serde_json::from_str::<WsIncoming>(&text) {
                        if incoming.msg_type == "ping" && pong_tx.send(()).is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    state.client_disconnected(&client_id);
    tracing::info!("WebSocket disconnected: {}", client_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionType;

    #[test]
    fn test_outgoing_messages() {
        let json = serde_json::to_value(WsOutgoing::action(Action::new(ActionType::Click, 7)))
            .unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["action"]["type"], "click");
        assert_eq!(json["action"]["timestamp"], 7);

        let pong = serde_json::to_value(WsOutgoing::pong()).unwrap();
        assert_eq!(pong, serde_json::json!({ "type": "pong" }));
    }
}
