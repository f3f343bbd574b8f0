//! Observer server startup helper for embedding in the device binary.
//!
//! [`spawn_observer`] launches the HTTP + `WebSocket` server on a background
//! Tokio task so it runs alongside whatever drives the display.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mirror_core::{MirrorSettings, StateMirror};
//! use mirror_observer::startup::spawn_observer;
//! use mirror_observer::{AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! let mirror = Arc::new(StateMirror::new(&MirrorSettings::default()));
//! let state = Arc::new(AppState::new(Arc::clone(&mirror)));
//! let handle = spawn_observer(&ServerConfig::default(), state)?;
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the observer HTTP server on a background Tokio task.
///
/// The server runs until the runtime shuts down or the returned handle is
/// aborted. Bind failures after spawning are logged from the task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse. This is checked before the task is spawned.
pub fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;
    let config = config.clone();

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(%addr, "Observer server spawned on background task");

    Ok(handle)
}
