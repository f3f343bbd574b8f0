//! Error types for the device binary.

use mirror_core::ConfigError;
use mirror_observer::StartupError;

/// Errors that stop the device from starting or running.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The observer server could not be started.
    #[error("observer startup error: {0}")]
    Startup(#[from] StartupError),

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {0}")]
    Signal(#[from] std::io::Error),
}
