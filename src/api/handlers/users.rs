//! User API handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::tasks::{InsertResponse, MessageResponse};
use crate::api::state::AppState;
use crate::error::Result;
use crate::model::UserDocument;

/// Registration outcome: the insert result, or a notice that the email is
/// already registered (deliberately not an error status).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    Created(InsertResponse),
    AlreadyExists(MessageResponse),
}

/// GET /users — all user records
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDocument>>> {
    Ok(Json(state.store.list_users().await?))
}

/// POST /users — first registration for an email wins; repeats are skipped.
///
/// Uniqueness is enforced here, not by the store: a lookup on `email`
/// precedes the insert.
pub async fn register_user(
    State(state): State<AppState>,
    Json(user): Json<UserDocument>,
) -> Result<Json<RegisterResponse>> {
    if state.store.find_user_by_email(&user.email).await?.is_some() {
        return Ok(Json(RegisterResponse::AlreadyExists(MessageResponse::new(
            "User already exists",
        ))));
    }

    let created = state.store.insert_user(user).await?;
    Ok(Json(RegisterResponse::Created(InsertResponse {
        acknowledged: true,
        inserted_id: created.id.map(|oid| oid.to_hex()),
    })))
}
