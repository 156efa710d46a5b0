//! Change events and the broadcast hub that fans them out to every
//! connected WebSocket session.
//!
//! The hub is backed by a `tokio::sync::broadcast::channel` so any number
//! of sessions can consume the same stream without blocking the sender.
//! Wire format is a JSON text frame, adjacently tagged:
//! `{"event": "taskAdded", "data": {...}}`.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::warn;

use crate::model::{TaskDocument, TaskPatch};

/// Capacity of the broadcast channel. A session that lags this far behind
/// skips the missed events and keeps going.
const HUB_CAPACITY: usize = 256;

/// Events a connected client may send over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Insert a new task
    NewTask(TaskDocument),
    /// Partial-merge update of an existing task
    UpdateTask(TaskPatch),
    /// Delete a task by id (bare string payload)
    DeleteTask(String),
}

/// Change notifications broadcast to every connected session, including
/// the one that triggered the mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ChangeEvent {
    /// A task was inserted; payload carries the assigned `_id`
    TaskAdded(TaskDocument),
    /// A task was partially updated
    TaskUpdated(TaskPatch),
    /// A task was deleted (bare id payload)
    TaskDeleted(String),
}

impl ChangeEvent {
    /// Wire name of the event, for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TaskAdded(_) => "taskAdded",
            Self::TaskUpdated(_) => "taskUpdated",
            Self::TaskDeleted(_) => "taskDeleted",
        }
    }
}

/// Shared broadcast hub for change events.
///
/// Clone cheaply — the underlying `broadcast::Sender` is Arc-backed.
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl EventHub {
    /// Create a new hub with the standard capacity.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self { tx }
    }

    /// Subscribe to the change stream. Only events emitted after the call
    /// are delivered; there is no replay.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    /// Broadcast a change to all current subscribers.
    ///
    /// Called only after the corresponding write was confirmed. `send`
    /// fails only when there are zero subscribers — the persisted state
    /// then diverges from what any client observed, so it is logged
    /// rather than silently dropped.
    pub fn emit(&self, event: ChangeEvent) {
        if let Err(broadcast::error::SendError(event)) = self.tx.send(event) {
            warn!(event = event.name(), "change committed with no connected sessions to notify");
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_event_wire_names() {
        let ev: ClientEvent =
            serde_json::from_value(json!({"event": "newTask", "data": {"title": "Buy milk"}}))
                .unwrap();
        let ClientEvent::NewTask(task) = ev else {
            panic!("expected newTask");
        };
        assert_eq!(task.fields["title"], json!("Buy milk"));

        let ev: ClientEvent = serde_json::from_value(
            json!({"event": "updateTask", "data": {"id": "abc", "updatedData": {"status": "done"}}}),
        )
        .unwrap();
        assert!(matches!(ev, ClientEvent::UpdateTask(_)));

        let ev: ClientEvent =
            serde_json::from_value(json!({"event": "deleteTask", "data": "abc"})).unwrap();
        assert_eq!(ev, ClientEvent::DeleteTask("abc".to_string()));
    }

    #[test]
    fn test_change_event_wire_shape() {
        let out = serde_json::to_value(ChangeEvent::TaskDeleted("abc".to_string())).unwrap();
        assert_eq!(out, json!({"event": "taskDeleted", "data": "abc"}));

        let patch = TaskPatch {
            id: "abc".to_string(),
            updated_data: [("status".to_string(), json!("done"))].into_iter().collect(),
        };
        let out = serde_json::to_value(ChangeEvent::TaskUpdated(patch)).unwrap();
        assert_eq!(
            out,
            json!({"event": "taskUpdated", "data": {"id": "abc", "updatedData": {"status": "done"}}})
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        let result = serde_json::from_value::<ClientEvent>(json!({"event": "dropTable", "data": 1}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_hub_fans_out_to_all_subscribers() {
        let hub = EventHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.emit(ChangeEvent::TaskDeleted("abc".to_string()));

        assert_eq!(a.recv().await.unwrap(), ChangeEvent::TaskDeleted("abc".to_string()));
        assert_eq!(b.recv().await.unwrap(), ChangeEvent::TaskDeleted("abc".to_string()));
    }

    #[test]
    fn test_emit_without_subscribers_does_not_panic() {
        let hub = EventHub::new();
        hub.emit(ChangeEvent::TaskDeleted("abc".to_string()));
    }
}
