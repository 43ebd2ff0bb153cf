//! WebSocket event transport
//!
//! GET /ws
//!
//! Server → client only: every [`ServerEvent`] as a JSON text frame. Client
//! frames other than close are ignored.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::ServerEvent;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| ws_session(socket, state))
}

async fn ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();
    let mut events = state.events.subscribe();

    tracing::info!(subscribers = state.events.subscriber_count(), "Event WS connected");

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "Event WS subscriber lagged, events skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    tracing::info!("Event WS disconnected");
}

async fn send_event<S>(sink: &mut S, event: &ServerEvent) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialize event");
    })?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
