//! Shared application state for the observer server.

use std::sync::Arc;

use mirror_core::StateMirror;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The mirror
/// owns both the display snapshot and the hub that observers attach to.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The display mirror observers are attached to.
    pub mirror: Arc<StateMirror>,
}

impl AppState {
    /// Serve the given mirror.
    pub const fn new(mirror: Arc<StateMirror>) -> Self {
        Self { mirror }
    }
}
