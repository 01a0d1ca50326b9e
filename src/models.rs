use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

use crate::error::ConfigError;

/// A single temperature/humidity sample. Temperature is in °F.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature: f32,
    pub humidity: f32,
    pub read_at: OffsetDateTime,
}

impl Reading {
    pub fn new(temperature: f32, humidity: f32) -> Self {
        Reading {
            temperature,
            humidity,
            read_at: OffsetDateTime::now_utc(),
        }
    }

    /// Missing, zero or non-finite values mean the sensor did not deliver data.
    pub fn is_valid(&self) -> bool {
        let usable = |v: f32| v.is_finite() && v != 0.0;
        usable(self.temperature) && usable(self.humidity)
    }

    pub fn value(&self, metric: Metric) -> f32 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
        }
    }
}

/// Running statistics since process start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub max_temperature: f32,
    pub min_temperature: f32,
    pub avg_temperature: Option<f32>,
    pub max_humidity: f32,
    pub min_humidity: f32,
    pub avg_humidity: Option<f32>,
    pub last_updated: Option<OffsetDateTime>,
    pub read_count: u64,
    pub error_count: u64,
    pub power_switch: bool,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            max_temperature: f32::NEG_INFINITY,
            min_temperature: f32::INFINITY,
            avg_temperature: None,
            max_humidity: f32::NEG_INFINITY,
            min_humidity: f32::INFINITY,
            avg_humidity: None,
            last_updated: None,
            read_count: 0,
            error_count: 0,
            power_switch: false,
        }
    }
}

/// One actuator transition. The interval fields stay empty until the next
/// transition closes the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayLogEntry {
    pub on: bool,
    pub timestamp: OffsetDateTime,
    pub interval: Option<time::Duration>,
    pub seconds: i64,
    pub duration: String,
}

impl RelayLogEntry {
    pub fn is_closed(&self) -> bool {
        self.interval.is_some()
    }
}

/// The quantity a trigger or alert looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Temperature,
    Humidity,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "F",
            Metric::Humidity => "%",
        }
    }
}

/// Which appliance the relay drives, selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    Heater,
    Humidifier,
}

impl DeviceMode {
    /// The metric whose trigger bounds drive the relay.
    pub fn metric(&self) -> Metric {
        match self {
            DeviceMode::Heater => Metric::Temperature,
            DeviceMode::Humidifier => Metric::Humidity,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviceMode::Heater => "Heater",
            DeviceMode::Humidifier => "Humidifier",
        }
    }
}

impl FromStr for DeviceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heater" => Ok(DeviceMode::Heater),
            "humidifier" => Ok(DeviceMode::Humidifier),
            other => Err(ConfigError::Invalid {
                var: "DEVICE_MODE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Process-wide control mode. Sensor mode only ever moves to timer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    SensorMode,
    TimerMode,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::SensorMode => write!(f, "sensor"),
            Mode::TimerMode => write!(f, "timer"),
        }
    }
}

/// Decision produced by the hysteresis controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TurnOn,
    TurnOff,
    NoOp,
}

/// Read-only view of the control state for presentation layers.
#[derive(Debug, Clone, Default)]
pub struct StatusSnapshot {
    pub mode: Mode,
    pub reading: Option<Reading>,
    pub stats: Stats,
    pub relay_log: Vec<RelayLogEntry>,
    pub average_on: Option<time::Duration>,
    pub average_off: Option<time::Duration>,
}
