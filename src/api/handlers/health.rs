//! Liveness handler

/// `GET /` — no data access, just proof the process is up.
pub async fn liveness() -> &'static str {
    "Task sync server is running..."
}
