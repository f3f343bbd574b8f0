//! Collaborator capability sets.
//!
//! [`DisplayBackend`] is the narrow interface of the thing that actually
//! draws pixels. The mirror holds an optional implementation and calls
//! through it before touching its own state. [`DeviceStatus`] supplies the
//! readings shown in the status bar.

use std::time::Duration;

use mirror_types::BatteryStatus;
use mirror_types::display::UNKNOWN_LEVEL;

/// Failure reported by a panel driver.
///
/// The mirror logs these and carries on: it reflects intended state, it
/// does not gate on the panel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The panel is not initialised or has gone away.
    #[error("display unavailable: {0}")]
    Unavailable(String),

    /// The driver rejected the call.
    #[error("display operation failed: {0}")]
    Failed(String),
}

/// Operations a physical display exposes.
///
/// Calls are synchronous and fire-and-forget from the mirror's point of view.
pub trait DisplayBackend: Send + Sync {
    /// Show a short status label.
    fn set_status(&self, status: &str) -> Result<(), BackendError>;

    /// Switch the emotion icon.
    fn set_emotion(&self, emotion: &str) -> Result<(), BackendError>;

    /// Switch the visual theme.
    fn set_theme(&self, theme: &str) -> Result<(), BackendError>;

    /// Append one line to the chat transcript. The panel keeps its own
    /// retention policy.
    fn append_message(&self, role: &str, content: &str) -> Result<(), BackendError>;

    /// Empty the chat transcript.
    fn clear_messages(&self) -> Result<(), BackendError>;

    /// Show a transient notice for `duration_ms` milliseconds.
    fn show_notification(&self, text: &str, duration_ms: i32) -> Result<(), BackendError>;

    /// Redraw the status bar; `update_all` forces every indicator.
    fn update_status_bar(&self, update_all: bool) -> Result<(), BackendError> {
        let _ = update_all;
        Ok(())
    }

    /// Enter or leave the panel's power-save mode.
    fn set_power_save_mode(&self, on: bool) -> Result<(), BackendError> {
        let _ = on;
        Ok(())
    }

    /// Build the panel's widget tree.
    fn setup_ui(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Take the panel's drawing lock, waiting at most `timeout`.
    ///
    /// Returns whether the lock was acquired. Panels without one always
    /// succeed.
    fn lock_panel(&self, timeout: Duration) -> Result<bool, BackendError> {
        let _ = timeout;
        Ok(true)
    }

    /// Release the drawing lock taken by [`lock_panel`](Self::lock_panel).
    fn unlock_panel(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Theme the panel is currently showing, if it knows.
    fn theme(&self) -> Option<String> {
        None
    }
}

/// Readings polled by the status bar.
pub trait DeviceStatus: Send + Sync {
    /// Current battery reading.
    fn battery(&self) -> BatteryStatus;

    /// Coarse connectivity descriptor (e.g. `wifi`, `4g`, `offline`).
    fn network(&self) -> String;

    /// Speaker volume (0-100), or `-1` when unknown.
    fn volume(&self) -> i32;
}

/// A device that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnknownDeviceStatus;

impl DeviceStatus for UnknownDeviceStatus {
    fn battery(&self) -> BatteryStatus {
        BatteryStatus::unknown()
    }

    fn network(&self) -> String {
        String::from("unknown")
    }

    fn volume(&self) -> i32 {
        UNKNOWN_LEVEL
    }
}
