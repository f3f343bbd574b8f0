//! REST API endpoint handlers for the observer server.
//!
//! Handlers read from the shared [`StateMirror`](mirror_core::StateMirror)
//! via [`AppState`]. Nothing here mutates the display.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/display/state` | Current snapshot as a `full_state` frame |
//! | `GET` | `/api/display/observers` | Connected observers and hub capacity |

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /api/display/state
// ---------------------------------------------------------------------------

/// Return the current display snapshot.
///
/// The body is byte-for-byte the `full_state` frame a newly attached
/// `WebSocket` observer receives.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let frame = state.mirror.snapshot_frame()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], frame))
}

// ---------------------------------------------------------------------------
// GET /api/display/observers
// ---------------------------------------------------------------------------

/// List the observers currently attached to the hub.
pub async fn list_observers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ObserverError> {
    let hub = state.mirror.hub();
    let observers = hub.observers();

    Ok(Json(serde_json::json!({
        "connected": observers.len(),
        "capacity": hub.capacity(),
        "observers": serde_json::to_value(&observers)?,
    })))
}
