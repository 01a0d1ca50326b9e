/// Error types for the control subsystem and its collaborators
///
/// None of these are fatal to the process: sensor failures are counted and
/// may trigger failover, everything else is logged and dropped.
use std::fmt;
use std::time::Duration;

/// The sensor did not produce a usable reading.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorReadError {
    /// Temperature or humidity was missing or zero.
    Missing,
    /// The read did not complete within the configured bound.
    Timeout(Duration),
    /// Driver or bus level failure.
    Transport(String),
}

impl fmt::Display for SensorReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "sensor data missing"),
            Self::Timeout(after) => write!(f, "sensor read timed out after {:?}", after),
            Self::Transport(msg) => write!(f, "sensor transport error: {}", msg),
        }
    }
}

impl std::error::Error for SensorReadError {}

/// An outbound notification could not be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationError(pub String);

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "notification dispatch failed: {}", self.0)
    }
}

impl std::error::Error for NotificationError {}

/// A reading could not be appended to storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceError(pub String);

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "persistence failed: {}", self.0)
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError(e.to_string())
    }
}

/// Startup configuration problems.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Missing(String),
    Invalid { var: String, value: String },
    /// A lower bound is not strictly below its upper bound.
    Bounds { name: String, lower: f32, upper: f32 },
    /// A duration or threshold that must be positive is zero.
    Zero(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "{} environment variable not set", var),
            Self::Invalid { var, value } => write!(f, "invalid value for {}: '{}'", var, value),
            Self::Bounds { name, lower, upper } => write!(
                f,
                "{} lower bound {} must be below upper bound {}",
                name, lower, upper
            ),
            Self::Zero(var) => write!(f, "{} must be greater than zero", var),
        }
    }
}

impl std::error::Error for ConfigError {}
