use ds1307::SqwRate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub square_wave: SquareWaveConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Linux I²C bus number (`/dev/i2c-N`).
    pub bus: u8,
    pub timeout_ms: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig {
            bus: 1,
            timeout_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Write the system's local time to the RTC on start-up.
    pub sync_from_system: bool,
    pub timezone_offset_hours: i8,
    pub timezone_offset_minutes: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquareWaveConfig {
    pub enabled: bool,
    pub rate_hz: u32,
    /// SQW/OUT level while the square wave is disabled.
    pub idle_level_high: bool,
}

impl Default for SquareWaveConfig {
    fn default() -> Self {
        SquareWaveConfig {
            enabled: false,
            rate_hz: 1,
            idle_level_high: false,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Try external file first
        if Path::new("config.toml").exists() {
            let config_content = fs::read_to_string("config.toml")?;
            let config = Config::parse(&config_content)?;
            log::info!("Loaded configuration from file");
            Ok(config)
        } else {
            // Fallback to embedded defaults
            let config = Config::parse(include_str!("../config.toml.example"))?;
            log::warn!("Using embedded default configuration");
            Ok(config)
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        // Surface a bad rate at load time rather than after the bus is opened.
        config.get_square_wave_rate()?;
        Ok(config)
    }
}

// Helper functions for easy access
impl Config {
    pub fn get_bus(&self) -> u8 {
        self.bus.bus
    }

    pub fn get_timeout_ms(&self) -> u32 {
        self.bus.timeout_ms
    }

    pub fn get_timezone_offset(&self) -> (i8, u8) {
        (
            self.clock.timezone_offset_hours,
            self.clock.timezone_offset_minutes,
        )
    }

    pub fn get_square_wave_rate(&self) -> anyhow::Result<SqwRate> {
        SqwRate::from_hz(self.square_wave.rate_hz).ok_or_else(|| {
            anyhow::anyhow!(
                "unsupported square-wave rate {} Hz (expected 1, 4096, 8192 or 32768)",
                self.square_wave.rate_hz
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_example_parses() {
        let config = Config::parse(include_str!("../config.toml.example")).unwrap();
        assert_eq!(config.get_bus(), 1);
        assert_eq!(config.get_timeout_ms(), 1000);
        assert_eq!(config.get_timezone_offset(), (-5, 0));
        assert_eq!(config.get_square_wave_rate().unwrap(), SqwRate::_1Hz);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.get_bus(), 1);
        assert!(!config.clock.sync_from_system);
        assert!(!config.square_wave.enabled);
    }

    #[test]
    fn rates_map_to_chip_codes() {
        let config = Config::parse("[square_wave]\nenabled = true\nrate_hz = 32768\nidle_level_high = false\n")
            .unwrap();
        assert_eq!(config.get_square_wave_rate().unwrap(), SqwRate::_32_768kHz);
    }

    #[test]
    fn unsupported_rate_is_rejected() {
        let err = Config::parse("[square_wave]\nenabled = true\nrate_hz = 1024\nidle_level_high = false\n")
            .unwrap_err();
        assert!(err.to_string().contains("1024"));
    }
}
