//! The observable display snapshot.
//!
//! [`DisplaySnapshot`] is exactly what a `full_state` event carries: every
//! field an observer needs to draw the screen from scratch. The device keeps
//! richer bookkeeping (notification expiry, the FIFO bound) on its side; this
//! type is the projection that crosses the wire.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::wire::{StateField, WireEvent};

/// Sentinel for "level not reported" on battery and volume readings.
pub const UNKNOWN_LEVEL: i32 = -1;

/// Battery indicator shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BatteryStatus {
    /// Charge percentage (0-100), or `-1` when unknown.
    pub level: i32,
    /// Whether the device is on external power.
    pub charging: bool,
}

impl BatteryStatus {
    /// A battery reading with no information.
    pub const fn unknown() -> Self {
        Self {
            level: UNKNOWN_LEVEL,
            charging: false,
        }
    }
}

impl Default for BatteryStatus {
    fn default() -> Self {
        Self::unknown()
    }
}

/// One line of the on-screen chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChatEntry {
    /// Speaker role (e.g. `user`, `assistant`, `system`). Opaque to the mirror.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatEntry {
    /// Build an entry from anything string-like.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Everything the display currently shows, minus transient notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DisplaySnapshot {
    /// Short status label.
    pub status: String,
    /// Mood/icon identifier, passed through unchanged.
    pub emotion: String,
    /// Visual theme name.
    pub theme: String,
    /// Battery indicator.
    pub battery: BatteryStatus,
    /// Coarse connectivity descriptor.
    pub network: String,
    /// Speaker volume (0-100), or `-1` when unknown.
    pub volume: i32,
    /// Chat transcript, oldest first.
    pub messages: Vec<ChatEntry>,
}

impl Default for DisplaySnapshot {
    fn default() -> Self {
        Self::with_theme("dark")
    }
}

impl DisplaySnapshot {
    /// The power-on state of the display with the given theme.
    pub fn with_theme(theme: impl Into<String>) -> Self {
        Self {
            status: String::from("Idle"),
            emotion: String::from("neutral"),
            theme: theme.into(),
            battery: BatteryStatus::unknown(),
            network: String::from("unknown"),
            volume: UNKNOWN_LEVEL,
            messages: Vec::new(),
        }
    }

    /// Fold one wire event into this snapshot, the way an observer does.
    ///
    /// A `full_state` replaces everything. Chat messages are appended and the
    /// transcript is trimmed from the front to `max_messages`. Notifications
    /// carry no persistent state and leave the snapshot untouched.
    pub fn apply(&mut self, event: &WireEvent, max_messages: usize) {
        match event {
            WireEvent::FullState { data } => data.clone_into(self),
            WireEvent::ChatMessage { role, content } => {
                self.messages.push(ChatEntry::new(role.as_str(), content.as_str()));
                let excess = self.messages.len().saturating_sub(max_messages);
                if excess > 0 {
                    self.messages.drain(..excess);
                }
            }
            WireEvent::StateUpdate { field, value } => match field {
                StateField::Status => value.clone_into(&mut self.status),
                StateField::Emotion => value.clone_into(&mut self.emotion),
                StateField::Theme => value.clone_into(&mut self.theme),
            },
            WireEvent::ClearMessages => self.messages.clear(),
            WireEvent::Notification { .. } => {}
            WireEvent::StatusBar {
                battery,
                network,
                volume,
            } => {
                self.battery = *battery;
                network.clone_into(&mut self.network);
                self.volume = *volume;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn power_on_defaults() {
        let snap = DisplaySnapshot::default();
        assert_eq!(snap.status, "Idle");
        assert_eq!(snap.emotion, "neutral");
        assert_eq!(snap.theme, "dark");
        assert_eq!(snap.battery, BatteryStatus::unknown());
        assert_eq!(snap.network, "unknown");
        assert_eq!(snap.volume, -1);
        assert!(snap.messages.is_empty());
    }

    #[test]
    fn apply_trims_transcript_from_the_front() {
        let mut snap = DisplaySnapshot::default();
        for i in 0..5 {
            snap.apply(
                &WireEvent::ChatMessage {
                    role: String::from("user"),
                    content: format!("m{i}"),
                },
                3,
            );
        }
        let contents: Vec<&str> = snap.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["m2", "m3", "m4"]);
    }

    #[test]
    fn apply_status_bar_and_scalar_fields() {
        let mut snap = DisplaySnapshot::default();
        snap.apply(
            &WireEvent::StateUpdate {
                field: StateField::Emotion,
                value: String::from("happy"),
            },
            40,
        );
        snap.apply(
            &WireEvent::StatusBar {
                battery: BatteryStatus {
                    level: 80,
                    charging: true,
                },
                network: String::from("wifi"),
                volume: 55,
            },
            40,
        );
        assert_eq!(snap.emotion, "happy");
        assert_eq!(snap.battery.level, 80);
        assert!(snap.battery.charging);
        assert_eq!(snap.network, "wifi");
        assert_eq!(snap.volume, 55);
    }

    #[test]
    fn notification_does_not_touch_snapshot() {
        let mut snap = DisplaySnapshot::default();
        let before = snap.clone();
        snap.apply(
            &WireEvent::Notification {
                message: String::from("Wi-Fi connected"),
                duration: 3000,
            },
            40,
        );
        assert_eq!(snap, before);
    }
}
