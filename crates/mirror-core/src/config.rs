//! Configuration loading and typed config structures for the display mirror.
//!
//! The canonical configuration lives in `mirror-config.yaml` next to the
//! device binary. Every section is optional; missing keys fall back to the
//! firmware defaults (port 8080, three observers, forty messages).

use std::path::Path;

use mirror_hub::DEFAULT_CAPACITY;
use serde::Deserialize;

use crate::state::DEFAULT_MAX_MESSAGES;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Where the observer server listens.
    pub server: ServerSettings,

    /// Mirror and hub limits.
    pub mirror: MirrorSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Fixed status-bar readings for boards without sensors.
    pub device: DeviceConfig,

    /// Scripted demo conversation.
    pub demo: DemoConfig,
}

impl MirrorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the listen address:
    /// - `MIRROR_HOST` overrides `server.host`
    /// - `MIRROR_PORT` overrides `server.port`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// Env overrides and validation apply in both cases.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the mirror unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mirror.max_messages == 0 {
            return Err(ConfigError::Invalid(String::from(
                "mirror.max_messages must be at least 1",
            )));
        }
        if self.mirror.max_observers == 0 {
            return Err(ConfigError::Invalid(String::from(
                "mirror.max_observers must be at least 1",
            )));
        }
        if self.demo.interval_ms == 0 {
            return Err(ConfigError::Invalid(String::from(
                "demo.interval_ms must be positive",
            )));
        }
        Ok(())
    }
}

/// Listen address for the observer server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// Apply `MIRROR_HOST` / `MIRROR_PORT` when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("MIRROR_HOST") {
            self.host = val;
        }
        if let Some(val) = lookup("MIRROR_PORT") {
            self.port = val
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid MIRROR_PORT: {e}")))?;
        }
        Ok(())
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Mirror and hub limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MirrorSettings {
    /// Transcript bound.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Maximum simultaneously connected observers.
    #[serde(default = "default_max_observers")]
    pub max_observers: usize,

    /// Theme shown at power-on.
    #[serde(default = "default_theme")]
    pub default_theme: String,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            max_observers: default_max_observers(),
            default_theme: default_theme(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Static status-bar readings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    /// Battery percentage, `-1` for unknown.
    #[serde(default = "default_unknown_level")]
    pub battery_level: i32,

    /// Whether the battery is charging.
    #[serde(default)]
    pub battery_charging: bool,

    /// Connectivity descriptor.
    #[serde(default = "default_network")]
    pub network: String,

    /// Volume percentage, `-1` for unknown.
    #[serde(default = "default_unknown_level")]
    pub volume: i32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            battery_level: default_unknown_level(),
            battery_charging: false,
            network: default_network(),
            volume: default_unknown_level(),
        }
    }
}

/// Scripted demo conversation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    /// Whether the demo script runs.
    #[serde(default)]
    pub enabled: bool,

    /// Milliseconds between script steps.
    #[serde(default = "default_demo_interval_ms")]
    pub interval_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_demo_interval_ms(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_messages() -> usize {
    DEFAULT_MAX_MESSAGES
}

const fn default_max_observers() -> usize {
    DEFAULT_CAPACITY
}

fn default_theme() -> String {
    "dark".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_unknown_level() -> i32 {
    -1
}

fn default_network() -> String {
    "unknown".to_owned()
}

const fn default_demo_interval_ms() -> u64 {
    2_000
}
