//! Device entry point for the display mirror.
//!
//! Boots the mirror in front of the panel driver, serves the observer push
//! channel, and optionally plays a scripted conversation so observers have
//! something to watch.
//!
//! # Architecture
//!
//! ```text
//! demo script --> StateMirror --> ConsoleBackend (panel)
//!                      |
//!                      +--> BroadcastHub --> /ws/display observers
//! ```
//!
//! The process runs until `Ctrl-C`.

mod backend;
mod demo;
mod error;
mod status;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mirror_core::{MirrorConfig, StateMirror};
use mirror_observer::{spawn_observer, AppState, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend::ConsoleBackend;
use crate::error::DeviceError;
use crate::status::ConfiguredDeviceStatus;

/// Config file used when `MIRROR_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "mirror-config.yaml";

/// Application entry point.
///
/// Loads configuration, initializes logging, wires the mirror to the console
/// panel, then serves observers until interrupted.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the observer server cannot
/// start, or the shutdown signal cannot be installed.
#[tokio::main]
async fn main() -> Result<(), DeviceError> {
    let config_path = std::env::var("MIRROR_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = MirrorConfig::load_or_default(&config_path)?;

    // Initialize structured logging; RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(path = %config_path.display(), "mirror-device starting");
    info!(
        host = config.server.host,
        port = config.server.port,
        max_messages = config.mirror.max_messages,
        max_observers = config.mirror.max_observers,
        demo = config.demo.enabled,
        "configuration loaded"
    );

    let panel = Arc::new(ConsoleBackend::new());
    let device = Arc::new(ConfiguredDeviceStatus::from(&config.device));
    let mirror = Arc::new(
        StateMirror::new(&config.mirror)
            .with_backend(panel.clone())
            .with_device_status(device),
    );
    mirror.setup_ui();
    mirror.set_power_save_mode(false);
    info!(power_save = panel.is_power_save(), "panel ready");
    mirror.update_status_bar(true);

    let state = Arc::new(AppState::new(Arc::clone(&mirror)));
    let server = spawn_observer(&ServerConfig::from(&config.server), state)?;

    let demo_task = config.demo.enabled.then(|| {
        info!(interval_ms = config.demo.interval_ms, "demo script enabled");
        tokio::spawn(demo::run(
            Arc::clone(&mirror),
            Duration::from_millis(config.demo.interval_ms),
        ))
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");

    if let Some(task) = demo_task {
        task.abort();
    }
    server.abort();

    info!(observers = mirror.hub().len(), "mirror-device stopped");
    Ok(())
}
