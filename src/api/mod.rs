//! Web API module: REST gateway plus the WebSocket event channel.

pub mod handlers;
pub mod state;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use state::AppState;

/// Create the API router
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        // Liveness
        .route("/", get(handlers::health::liveness))
        // Tasks API
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/task", post(handlers::tasks::create_task))
        .route("/task/{id}", patch(handlers::tasks::update_task))
        .route("/task/{id}", delete(handlers::tasks::delete_task))
        // Users API
        .route("/users", get(handlers::users::list_users))
        .route("/users", post(handlers::users::register_user))
        // Event channel WebSocket
        .route("/ws", get(handlers::sync::ws_handler))
}

/// Create the full router with CORS and request logging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the server (REST + event channel on one listener)
pub async fn start_server(port: u16, state: AppState) -> crate::error::Result<()> {
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(port, "task sync server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
