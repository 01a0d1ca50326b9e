#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use humidimon::config::MonitorConfig;
use humidimon::drivers::{Actuator, Display, Notifier, Sensor, Storage};
use humidimon::error::{NotificationError, PersistenceError, SensorReadError};
use humidimon::models::Reading;

pub enum Step {
    Read(f32, f32),
    Fail,
    Hang,
}

/// Replays a script; once exhausted every read fails.
#[derive(Default)]
pub struct ScriptedSensor {
    steps: VecDeque<Step>,
    pub reads: usize,
}

impl ScriptedSensor {
    pub fn new(steps: Vec<Step>) -> Self {
        ScriptedSensor {
            steps: steps.into(),
            reads: 0,
        }
    }
}

impl Sensor for ScriptedSensor {
    async fn read(&mut self) -> Result<Reading, SensorReadError> {
        self.reads += 1;
        match self.steps.pop_front() {
            Some(Step::Read(t, h)) => Ok(Reading::new(t, h)),
            Some(Step::Hang) => std::future::pending().await,
            Some(Step::Fail) | None => Err(SensorReadError::Transport("bus error".to_string())),
        }
    }
}

#[derive(Default)]
pub struct RecordingRelay {
    pub writes: Vec<bool>,
}

impl Actuator for RecordingRelay {
    fn set_state(&mut self, on: bool) {
        self.writes.push(on);
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub lines: Vec<(String, String)>,
}

impl Display for RecordingDisplay {
    fn write_lines(&mut self, line1: &str, line2: &str) {
        self.lines.push((line1.to_string(), line2.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.messages()
            .iter()
            .filter(|m| m.starts_with(prefix))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(NotificationError("network down".to_string()));
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryStorage {
    pub rows: Arc<Mutex<Vec<Reading>>>,
    pub fail: bool,
    /// Appends never complete.
    pub hang: bool,
}

impl Storage for MemoryStorage {
    async fn append(&self, reading: &Reading) -> Result<(), PersistenceError> {
        if self.hang {
            return std::future::pending().await;
        }
        if self.fail {
            return Err(PersistenceError("disk full".to_string()));
        }
        self.rows.lock().unwrap().push(*reading);
        Ok(())
    }
}

/// Heater config with short timers: 2.5s poll, 10s failover phases.
pub fn heater_config(overrides: &[(&str, &str)]) -> MonitorConfig {
    let mut vars: HashMap<String, String> = [
        ("DEVICE_MODE", "heater"),
        ("LOWER_TRIGGER", "68"),
        ("UPPER_TRIGGER", "72"),
        ("ERROR_THRESHOLD", "3"),
        ("TIMER_ON_MS", "10000"),
        ("TIMER_OFF_MS", "10000"),
        ("SENSOR_TIMEOUT_MS", "1000"),
        ("SCAN_DURATION_SECS", "0"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    MonitorConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

pub async fn stop_after(millis: u64) {
    tokio::time::sleep(Duration::from_millis(millis)).await;
}
