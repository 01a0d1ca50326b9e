//! Collaborator interfaces the control loop drives.
//!
//! Concrete drivers live in `bluetooth`, `gpio`, `notify` and `database`;
//! `console` holds log-only stand-ins and tests substitute in-memory versions.
use std::future::Future;

use crate::error::{NotificationError, PersistenceError, SensorReadError};
use crate::models::Reading;

pub mod console;

pub use console::{LogActuator, LogDisplay, LogNotifier};

/// Source of temperature/humidity readings. May fail transiently.
pub trait Sensor {
    fn read(&mut self) -> impl Future<Output = Result<Reading, SensorReadError>> + Send;
}

/// Binary actuator (relay). Idempotent.
pub trait Actuator {
    fn set_state(&mut self, on: bool);
}

/// Two-line text display. Best effort.
pub trait Display {
    fn write_lines(&mut self, line1: &str, line2: &str);
}

/// Outbound operator notifications.
pub trait Notifier {
    fn send(&self, text: &str) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Append-only reading history.
pub trait Storage: Send + Sync + 'static {
    fn append(&self, reading: &Reading)
        -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
