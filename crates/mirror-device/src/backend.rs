//! Console panel driver.
//!
//! Boards without a screen attached draw to the log instead. Every call
//! succeeds and is reported on the `panel` target.

use std::sync::atomic::{AtomicBool, Ordering};

use mirror_core::{BackendError, DisplayBackend};
use tracing::info;

/// A [`DisplayBackend`] that renders to structured log lines.
#[derive(Debug, Default)]
pub struct ConsoleBackend {
    power_save: AtomicBool,
}

impl ConsoleBackend {
    /// Create a driver with power save off.
    pub const fn new() -> Self {
        Self {
            power_save: AtomicBool::new(false),
        }
    }

    /// Whether the panel is currently in power-save mode.
    pub fn is_power_save(&self) -> bool {
        self.power_save.load(Ordering::Relaxed)
    }
}

impl DisplayBackend for ConsoleBackend {
    fn setup_ui(&self) -> Result<(), BackendError> {
        info!(target: "panel", "layout built");
        Ok(())
    }

    fn set_status(&self, status: &str) -> Result<(), BackendError> {
        info!(target: "panel", status, "status");
        Ok(())
    }

    fn set_emotion(&self, emotion: &str) -> Result<(), BackendError> {
        info!(target: "panel", emotion, "emotion");
        Ok(())
    }

    fn set_theme(&self, theme: &str) -> Result<(), BackendError> {
        info!(target: "panel", theme, "theme");
        Ok(())
    }

    fn append_message(&self, role: &str, content: &str) -> Result<(), BackendError> {
        info!(target: "panel", role, content, "chat");
        Ok(())
    }

    fn clear_messages(&self) -> Result<(), BackendError> {
        info!(target: "panel", "chat cleared");
        Ok(())
    }

    fn show_notification(&self, text: &str, duration_ms: i32) -> Result<(), BackendError> {
        info!(target: "panel", text, duration_ms, "notification");
        Ok(())
    }

    fn update_status_bar(&self, update_all: bool) -> Result<(), BackendError> {
        info!(target: "panel", update_all, "status bar redraw");
        Ok(())
    }

    fn set_power_save_mode(&self, on: bool) -> Result<(), BackendError> {
        self.power_save.store(on, Ordering::Relaxed);
        info!(target: "panel", on, "power save");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_call_succeeds() {
        let panel = ConsoleBackend::new();
        assert!(panel.setup_ui().is_ok());
        assert!(panel.set_status("Listening").is_ok());
        assert!(panel.set_emotion("happy").is_ok());
        assert!(panel.set_theme("light").is_ok());
        assert!(panel.append_message("user", "hi").is_ok());
        assert!(panel.clear_messages().is_ok());
        assert!(panel.show_notification("ping", -5).is_ok());
        assert!(panel.update_status_bar(true).is_ok());
    }

    #[test]
    fn power_save_toggles() {
        let panel = ConsoleBackend::new();
        assert!(!panel.is_power_save());

        assert!(panel.set_power_save_mode(true).is_ok());
        assert!(panel.is_power_save());

        assert!(panel.set_power_save_mode(false).is_ok());
        assert!(!panel.is_power_save());
    }
}
