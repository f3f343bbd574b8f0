//! Axum router construction for the observer API.
//!
//! Assembles the REST and `WebSocket` routes into a single [`Router`] with
//! CORS enabled so a browser-hosted mirror page can connect from anywhere.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the observer server.
///
/// The router includes:
/// - `GET /ws/display` -- `WebSocket` display event stream
/// - `GET /api/display/state` -- current display snapshot
/// - `GET /api/display/observers` -- connected observers
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // WebSocket
        .route("/ws/display", get(ws::ws_display))
        // REST API
        .route("/api/display/state", get(handlers::get_state))
        .route("/api/display/observers", get(handlers::list_observers))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
