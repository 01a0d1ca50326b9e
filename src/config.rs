use log::info;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::{DeviceMode, Metric};

/// A lower/upper pair. Lower must be strictly below upper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f32,
    pub upper: f32,
}

impl Bounds {
    pub fn new(name: &str, lower: f32, upper: f32) -> Result<Self, ConfigError> {
        if !(lower < upper) {
            return Err(ConfigError::Bounds {
                name: name.to_string(),
                lower,
                upper,
            });
        }
        Ok(Bounds { lower, upper })
    }
}

/// How sensor failures are counted against the failover threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCounting {
    /// Reset to zero on every good reading.
    Consecutive,
    /// Every failure since process start counts.
    Cumulative,
}

impl FromStr for ErrorCounting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consecutive" => Ok(ErrorCounting::Consecutive),
            "cumulative" => Ok(ErrorCounting::Cumulative),
            other => Err(ConfigError::Invalid {
                var: "ERROR_COUNTING".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub to: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub db_interval: Duration,
    pub sensor_timeout: Duration,
    pub device_mode: DeviceMode,
    pub throttle_window: Duration,
    pub temperature_alert: Bounds,
    pub humidity_alert: Bounds,
    pub trigger: Bounds,
    pub error_threshold: u32,
    pub error_counting: ErrorCounting,
    pub timer_on: Duration,
    pub timer_off: Duration,
    pub ruuvi_tag: Option<String>,
    pub scan_duration: Duration,
    pub relay_gpio: u8,
    pub lcd_address: u16,
    pub twilio: Option<TwilioConfig>,
    pub database_url: Option<String>,
    pub csv_path: PathBuf,
}

impl MonitorConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        config.log_summary();
        Ok(config)
    }

    /// Build from any key lookup. Unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        let device_mode: DeviceMode = vars.parse_or("DEVICE_MODE", DeviceMode::Heater)?;

        let temperature_alert = Bounds::new(
            "temperature alert",
            vars.parse_or("LOWER_TEMPERATURE_LIMIT", 72.0)?,
            vars.parse_or("UPPER_TEMPERATURE_LIMIT", 80.0)?,
        )?;
        let humidity_alert = Bounds::new(
            "humidity alert",
            vars.parse_or("LOWER_HUMIDITY_LIMIT", 70.0)?,
            vars.parse_or("UPPER_HUMIDITY_LIMIT", 99.0)?,
        )?;
        let (default_lower, default_upper) = match device_mode.metric() {
            Metric::Temperature => (68.0, 72.0),
            Metric::Humidity => (75.0, 85.0),
        };
        let trigger = Bounds::new(
            "actuator trigger",
            vars.parse_or("LOWER_TRIGGER", default_lower)?,
            vars.parse_or("UPPER_TRIGGER", default_upper)?,
        )?;

        let error_threshold: u32 = vars.parse_or("ERROR_THRESHOLD", 3)?;
        if error_threshold == 0 {
            return Err(ConfigError::Zero("ERROR_THRESHOLD".to_string()));
        }

        let twilio = match (
            lookup("ACCOUNT_SID"),
            lookup("AUTH_TOKEN"),
            lookup("TWILIO_SEND_TO_NUMBER"),
            lookup("TWILIO_SEND_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(to), Some(from)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                to,
                from,
            }),
            _ => None,
        };

        let lcd_address = match lookup("LCD_I2C_ADDRESS") {
            Some(raw) => parse_address(&raw).ok_or(ConfigError::Invalid {
                var: "LCD_I2C_ADDRESS".to_string(),
                value: raw,
            })?,
            None => 0x27,
        };

        // The first read waits out the scan window, so it must fit in the read timeout.
        let sensor_timeout = vars.millis("SENSOR_TIMEOUT_MS", 30_000)?;
        let scan_secs: u64 = vars.parse_or("SCAN_DURATION_SECS", 10)?;
        let scan_duration = Duration::from_secs(scan_secs);
        if scan_duration >= sensor_timeout {
            return Err(ConfigError::Invalid {
                var: "SCAN_DURATION_SECS".to_string(),
                value: format!("{} (must be shorter than SENSOR_TIMEOUT_MS)", scan_secs),
            });
        }

        Ok(MonitorConfig {
            poll_interval: vars.millis("SENSOR_INTERVAL_MS", 2_500)?,
            db_interval: vars.millis("DB_INTERVAL_MS", 60_000)?,
            sensor_timeout,
            device_mode,
            throttle_window: vars.millis("NOTIFICATION_THROTTLE_MS", 1_800_000)?,
            temperature_alert,
            humidity_alert,
            trigger,
            error_threshold,
            error_counting: vars.parse_or("ERROR_COUNTING", ErrorCounting::Consecutive)?,
            timer_on: vars.millis("TIMER_ON_MS", 900_000)?,
            timer_off: vars.millis("TIMER_OFF_MS", 900_000)?,
            ruuvi_tag: lookup("RUUVI_TAG").map(|mac| mac.trim().to_uppercase()),
            scan_duration,
            relay_gpio: vars.parse_or("RELAY_GPIO", 17)?,
            lcd_address,
            twilio,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            csv_path: lookup("CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("humidimon.csv")),
        })
    }

    fn log_summary(&self) {
        info!("Device mode: {}", self.device_mode.label());
        info!(
            "Poll interval: {:?}, storage interval: {:?}",
            self.poll_interval, self.db_interval
        );
        info!(
            "Actuator trigger: {} - {}{}",
            self.trigger.lower,
            self.trigger.upper,
            self.device_mode.metric().unit()
        );
        info!(
            "Failover after {} failures ({:?}), timer {:?} on / {:?} off",
            self.error_threshold, self.error_counting, self.timer_on, self.timer_off
        );
        if self.twilio.is_none() {
            info!("Twilio credentials not set, notifications will only be logged");
        }
    }
}

struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn parse_or<T: FromStr>(&self, var: &str, default: T) -> Result<T, ConfigError> {
        match (self.0)(var) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: var.to_string(),
                value: raw,
            }),
            None => Ok(default),
        }
    }

    fn millis(&self, var: &str, default: u64) -> Result<Duration, ConfigError> {
        let ms: u64 = self.parse_or(var, default)?;
        if ms == 0 {
            return Err(ConfigError::Zero(var.to_string()));
        }
        Ok(Duration::from_millis(ms))
    }
}

fn parse_address(raw: &str) -> Option<u16> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<MonitorConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MonitorConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn unset_vars_take_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(2_500));
        assert_eq!(config.db_interval, Duration::from_millis(60_000));
        assert_eq!(config.throttle_window, Duration::from_millis(1_800_000));
        assert_eq!(config.device_mode, DeviceMode::Heater);
        assert_eq!(config.temperature_alert, Bounds { lower: 72.0, upper: 80.0 });
        assert_eq!(config.humidity_alert, Bounds { lower: 70.0, upper: 99.0 });
        assert_eq!(config.error_counting, ErrorCounting::Consecutive);
        assert_eq!(config.lcd_address, 0x27);
        assert!(config.twilio.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn humidifier_defaults_to_humidity_trigger() {
        let config = load(&[("DEVICE_MODE", "humidifier")]).unwrap();
        assert_eq!(config.trigger, Bounds { lower: 75.0, upper: 85.0 });
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = load(&[("LOWER_TRIGGER", "75"), ("UPPER_TRIGGER", "70")]).unwrap_err();
        assert!(matches!(err, ConfigError::Bounds { .. }));

        let err = load(&[("LOWER_HUMIDITY_LIMIT", "50"), ("UPPER_HUMIDITY_LIMIT", "50")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Bounds { .. }));
    }

    #[test]
    fn rejects_zero_intervals_and_threshold() {
        assert_eq!(
            load(&[("SENSOR_INTERVAL_MS", "0")]).unwrap_err(),
            ConfigError::Zero("SENSOR_INTERVAL_MS".to_string())
        );
        assert_eq!(
            load(&[("ERROR_THRESHOLD", "0")]).unwrap_err(),
            ConfigError::Zero("ERROR_THRESHOLD".to_string())
        );
    }

    #[test]
    fn scan_window_must_fit_in_read_timeout() {
        let err = load(&[("SCAN_DURATION_SECS", "30")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "SCAN_DURATION_SECS"));

        let err = load(&[("SCAN_DURATION_SECS", "5"), ("SENSOR_TIMEOUT_MS", "5000")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let config = load(&[("SCAN_DURATION_SECS", "5"), ("SENSOR_TIMEOUT_MS", "5001")]).unwrap();
        assert_eq!(config.scan_duration, Duration::from_secs(5));
    }

    #[test]
    fn reports_unparseable_values() {
        let err = load(&[("ERROR_THRESHOLD", "three")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                var: "ERROR_THRESHOLD".to_string(),
                value: "three".to_string()
            }
        );
    }

    #[test]
    fn twilio_requires_all_credentials() {
        let partial = load(&[("ACCOUNT_SID", "AC1"), ("AUTH_TOKEN", "t")]).unwrap();
        assert!(partial.twilio.is_none());

        let full = load(&[
            ("ACCOUNT_SID", "AC1"),
            ("AUTH_TOKEN", "t"),
            ("TWILIO_SEND_TO_NUMBER", "+15550001"),
            ("TWILIO_SEND_FROM_NUMBER", "+15550002"),
        ])
        .unwrap();
        assert_eq!(full.twilio.unwrap().to, "+15550001");
    }

    #[test]
    fn parses_hex_lcd_address_and_tag() {
        let config = load(&[("LCD_I2C_ADDRESS", "0x3F"), ("RUUVI_TAG", " aa:bb:cc:dd:ee:ff ")])
            .unwrap();
        assert_eq!(config.lcd_address, 0x3F);
        assert_eq!(config.ruuvi_tag.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
    }
}
