//! Sensing-and-control loop for a heater or humidifier relay.
//!
//! Reads temperature/humidity, keeps running statistics, switches the relay
//! with hysteresis, throttles operator alerts and falls back to a fixed duty
//! cycle when the sensor stops delivering data.

pub mod bluetooth;
pub mod config;
pub mod control;
pub mod database;
pub mod drivers;
pub mod error;
#[cfg(feature = "gpio")]
pub mod gpio;
pub mod models;
pub mod notify;
pub mod utils;
