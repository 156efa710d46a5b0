//! WebSocket event channel handler.
//!
//! Each connection is a transient session: a generated UUID for log lines,
//! a pump task forwarding the change stream to the socket, and an inbound
//! loop decoding named client events. Broadcasts go to every session with
//! no sender exclusion — the originator hears its own change back, and that
//! is its only acknowledgment.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::error::Result;
use crate::events::{ChangeEvent, ClientEvent};

/// WebSocket upgrade handler for the event channel
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

async fn handle_session(socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    info!(%session_id, "client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut changes = state.hub.subscribe();

    // Change stream → socket. A session that lags past the hub capacity
    // skips the missed events and keeps receiving.
    let forward = tokio::spawn(async move {
        loop {
            let event = match changes.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session lagged behind the change stream");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Socket → store. Bad frames and failed operations are logged and the
    // session stays open; no error frame goes back on this transport.
    while let Some(Ok(message)) = ws_rx.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let event = match serde_json::from_str::<ClientEvent>(&text) {
            Ok(event) => event,
            Err(err) => {
                warn!(%session_id, %err, "discarding unparseable frame");
                continue;
            }
        };

        if let Err(err) = apply(&state, event).await {
            error!(%session_id, %err, "task operation failed");
        }
    }

    forward.abort();
    info!(%session_id, "client disconnected");
}

/// Apply a client event to the store, broadcasting only after the write is
/// confirmed.
async fn apply(state: &AppState, event: ClientEvent) -> Result<()> {
    match event {
        ClientEvent::NewTask(task) => {
            let created = state.store.insert_task(task).await?;
            state.hub.emit(ChangeEvent::TaskAdded(created));
        }
        ClientEvent::UpdateTask(patch) => {
            state
                .store
                .update_task(&patch.id, &patch.updated_data)
                .await?;
            state.hub.emit(ChangeEvent::TaskUpdated(patch));
        }
        ClientEvent::DeleteTask(id) => {
            state.store.delete_task(&id).await?;
            state.hub.emit(ChangeEvent::TaskDeleted(id));
        }
    }
    Ok(())
}
