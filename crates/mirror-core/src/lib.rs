//! The display state mirror.
//!
//! [`StateMirror`] sits between application code and the physical display.
//! Every mutation is forwarded to the panel driver, folded into a canonical
//! [`DisplayState`], and published to remote observers through a
//! [`BroadcastHub`](mirror_hub::BroadcastHub) as one wire event.
//!
//! # Architecture
//!
//! ```text
//! app --> StateMirror --> DisplayBackend (panel driver, optional)
//!              |
//!              +--> DisplayState (own mutex)
//!              |
//!              +--> BroadcastHub --> observers
//! ```
//!
//! Newly connected observers go through [`StateMirror::attach`], which admits
//! them and pushes a `full_state` frame before any delta can reach them.
//!
//! # Modules
//!
//! - [`backend`] -- Capability traits for the panel driver and device status
//! - [`config`] -- YAML configuration with env overrides
//! - [`error`] -- Mirror error types
//! - [`mirror`] -- The interception decorator itself
//! - [`state`] -- The canonical display state and its FIFO transcript

pub mod backend;
pub mod config;
pub mod error;
pub mod mirror;
pub mod state;

pub use backend::{BackendError, DeviceStatus, DisplayBackend, UnknownDeviceStatus};
pub use config::{ConfigError, MirrorConfig, MirrorSettings};
pub use error::MirrorError;
pub use mirror::StateMirror;
pub use state::{DisplayState, Notification};
