//! Status-bar readings taken from configuration.

use mirror_core::DeviceStatus;
use mirror_core::config::DeviceConfig;
use mirror_types::BatteryStatus;
use mirror_types::display::UNKNOWN_LEVEL;

const MAX_LEVEL: i32 = 100;

/// Fixed readings for boards without battery or volume sensors.
///
/// Levels outside `0..=100` are clamped; anything negative reads as unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredDeviceStatus {
    battery: BatteryStatus,
    network: String,
    volume: i32,
}

impl From<&DeviceConfig> for ConfiguredDeviceStatus {
    fn from(config: &DeviceConfig) -> Self {
        Self {
            battery: BatteryStatus {
                level: clamp_level(config.battery_level),
                charging: config.battery_charging,
            },
            network: config.network.clone(),
            volume: clamp_level(config.volume),
        }
    }
}

impl DeviceStatus for ConfiguredDeviceStatus {
    fn battery(&self) -> BatteryStatus {
        self.battery
    }

    fn network(&self) -> String {
        self.network.clone()
    }

    fn volume(&self) -> i32 {
        self.volume
    }
}

const fn clamp_level(level: i32) -> i32 {
    if level < 0 {
        UNKNOWN_LEVEL
    } else if level > MAX_LEVEL {
        MAX_LEVEL
    } else {
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_read_as_unknown() {
        let status = ConfiguredDeviceStatus::from(&DeviceConfig::default());
        assert_eq!(status.battery(), BatteryStatus::unknown());
        assert_eq!(status.network(), "unknown");
        assert_eq!(status.volume(), -1);
    }

    #[test]
    fn configured_values_pass_through() {
        let status = ConfiguredDeviceStatus::from(&DeviceConfig {
            battery_level: 87,
            battery_charging: true,
            network: String::from("wifi"),
            volume: 60,
        });
        assert_eq!(status.battery().level, 87);
        assert!(status.battery().charging);
        assert_eq!(status.network(), "wifi");
        assert_eq!(status.volume(), 60);
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        let status = ConfiguredDeviceStatus::from(&DeviceConfig {
            battery_level: 250,
            volume: -40,
            ..DeviceConfig::default()
        });
        assert_eq!(status.battery().level, 100);
        assert_eq!(status.volume(), -1);
    }
}
