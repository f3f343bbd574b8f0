//! Shared type definitions for the display mirror.
//!
//! This crate is the single source of truth for everything that crosses the
//! push channel between the device and its remote observers. Types defined
//! here flow downstream to `TypeScript` via `ts-rs` for the browser renderer.
//!
//! # Modules
//!
//! - [`display`] -- The display snapshot (status, emotion, theme, status bar,
//!   chat transcript) and its observer-side replay
//! - [`wire`] -- The JSON envelope pushed to observers, one per event

pub mod display;
pub mod wire;

// Re-export all public types at crate root for convenience.
pub use display::{BatteryStatus, ChatEntry, DisplaySnapshot};
pub use wire::{StateField, WireEvent};
