//! Leaderboard WebSocket
//!
//! Transport half of the notifier. Each accepted socket registers a
//! subscriber, gets a fresh snapshot right away, and then forwards
//! whatever the notifier broadcasts. Client frames are read only to
//! notice the close; their content is ignored. The registry entry is
//! removed on every exit path.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::time::{Instant, interval_at};

use crate::application::queries::LeaderboardQuery;
use crate::domain::repository::CodeRepository;
use crate::error::CodeResult;
use crate::presentation::dto::LeaderboardEntryDto;
use crate::presentation::handlers::CodesAppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /ws/leaderboard
pub async fn leaderboard_ws<R>(
    ws: WebSocketUpgrade,
    State(state): State<CodesAppState<R>>,
) -> Response
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket<R>(socket: WebSocket, state: CodesAppState<R>)
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let subscription = state.notifier.subscribe();
    let id = subscription.id;
    let mut updates = subscription.receiver;
    let (mut sink, mut stream) = socket.split();

    // New subscribers always get their own fresh snapshot, so a racing
    // broadcast missed during registration is harmless
    match snapshot_json(&state).await {
        Ok(json) => {
            if sink.send(Message::Text(json.into())).await.is_err() {
                state.notifier.unsubscribe(id);
                return;
            }
        }
        Err(e) => {
            tracing::warn!(%id, error = %e, "Initial leaderboard snapshot failed");
            state.notifier.unsubscribe(id);
            let _ = sink.close().await;
            return;
        }
    }

    let mut ping = interval_at(Instant::now() + PING_INTERVAL, PING_INTERVAL);

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Some(json) => {
                        if sink.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    // Sender side dropped: the notifier evicted us
                    None => break,
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.notifier.unsubscribe(id);
    let _ = sink.close().await;
    tracing::debug!(%id, "Leaderboard socket closed");
}

async fn snapshot_json<R>(state: &CodesAppState<R>) -> CodeResult<String>
where
    R: CodeRepository + Clone + Send + Sync + 'static,
{
    let entries = LeaderboardQuery::new(state.repo.clone(), state.config.clone())
        .execute()
        .await?;
    let snapshot: Vec<LeaderboardEntryDto> = entries.into_iter().map(Into::into).collect();
    Ok(serde_json::to_string(&snapshot)?)
}
