//! Task API handlers
//!
//! REST fallback for the event channel: each mutation applies to the store
//! first and broadcasts the same change event its WebSocket counterpart
//! would, so clients on either transport observe the same stream.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::state::AppState;
use crate::error::Result;
use crate::events::ChangeEvent;
use crate::model::{TaskDocument, TaskPatch};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Insert outcome, mirroring the driver's acknowledgment shape
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_id: Option<String>,
}

/// Confirmation message for update/delete (and duplicate-user replies)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tasks — all task records
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskDocument>>> {
    Ok(Json(state.store.list_tasks().await?))
}

/// POST /task — insert the body as a new task, broadcast `taskAdded`
pub async fn create_task(
    State(state): State<AppState>,
    Json(task): Json<TaskDocument>,
) -> Result<Json<InsertResponse>> {
    let created = state.store.insert_task(task).await?;
    let inserted_id = created.id.map(|oid| oid.to_hex());
    state.hub.emit(ChangeEvent::TaskAdded(created));

    Ok(Json(InsertResponse {
        acknowledged: true,
        inserted_id,
    }))
}

/// PATCH /task/{id} — partial-merge update, broadcast `taskUpdated`
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(updated_data): Json<Map<String, Value>>,
) -> Result<Json<MessageResponse>> {
    state.store.update_task(&id, &updated_data).await?;
    state.hub.emit(ChangeEvent::TaskUpdated(TaskPatch { id, updated_data }));

    Ok(Json(MessageResponse::new("Task updated")))
}

/// DELETE /task/{id} — delete by id, broadcast `taskDeleted`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.store.delete_task(&id).await?;
    state.hub.emit(ChangeEvent::TaskDeleted(id));

    Ok(Json(MessageResponse::new("Task deleted")))
}
