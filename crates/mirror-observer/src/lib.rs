//! Observer server for the display mirror.
//!
//! This crate binds a [`StateMirror`](mirror_core::StateMirror) to an Axum
//! HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/display`) pushing one JSON frame per
//!   display event, starting with a `full_state` snapshot
//! - **REST endpoints** for the current snapshot and the connected observer
//!   set
//!
//! # Architecture
//!
//! Each upgraded socket gets a bounded outbound queue. The queue's sender is
//! registered with the mirror's hub as the connection's sink, so fan-out
//! never waits on a socket; a per-connection task drains the queue into the
//! socket and detaches the connection when the socket closes.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use startup::{spawn_observer, StartupError};
pub use state::AppState;
