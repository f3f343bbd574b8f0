//! The push-channel wire protocol.
//!
//! Every frame sent to an observer is one JSON object whose `type` field
//! names the event. String escaping is delegated to `serde_json`, so any
//! content (quotes, backslashes, control characters, arbitrary length)
//! always produces a structurally valid frame.
//!
//! | `type` | fields |
//! |--------|--------|
//! | `full_state` | `data` ([`DisplaySnapshot`]) |
//! | `chat_message` | `role`, `content` |
//! | `state_update` | `field`, `value` |
//! | `clear_messages` | -- |
//! | `notification` | `message`, `duration` (ms) |
//! | `status_bar` | `battery`, `network`, `volume` |

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::display::{BatteryStatus, DisplaySnapshot};

/// Scalar display fields that change through a `state_update` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// The status label.
    Status,
    /// The emotion identifier.
    Emotion,
    /// The theme name.
    Theme,
}

/// One server-to-observer message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    /// Complete display state, sent once to a newly admitted observer.
    FullState {
        /// The snapshot at admission time.
        data: DisplaySnapshot,
    },
    /// One message appended to the transcript.
    ChatMessage {
        /// Speaker role.
        role: String,
        /// Message text.
        content: String,
    },
    /// One scalar field changed.
    StateUpdate {
        /// Which field.
        field: StateField,
        /// Its new value.
        value: String,
    },
    /// The transcript was emptied.
    ClearMessages,
    /// A transient notice; observers hide it after `duration` milliseconds.
    Notification {
        /// Notice text.
        message: String,
        /// Display time in milliseconds.
        duration: u32,
    },
    /// Combined status-bar refresh.
    StatusBar {
        /// Battery indicator.
        battery: BatteryStatus,
        /// Connectivity descriptor.
        network: String,
        /// Speaker volume, `-1` when unknown.
        volume: i32,
    },
}

impl WireEvent {
    /// The `type` tag of this event.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FullState { .. } => "full_state",
            Self::ChatMessage { .. } => "chat_message",
            Self::StateUpdate { .. } => "state_update",
            Self::ClearMessages => "clear_messages",
            Self::Notification { .. } => "notification",
            Self::StatusBar { .. } => "status_bar",
        }
    }

    /// Serialize to a single JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a frame produced by [`to_json`](Self::to_json).
    pub fn from_json(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}
