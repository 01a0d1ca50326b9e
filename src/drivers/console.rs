//! Drivers that only write to the log, for hosts without the relay board.
use log::info;

use crate::drivers::{Actuator, Display, Notifier};
use crate::error::NotificationError;

/// Notifier used when no SMS credentials are configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        info!("NOTIFY: {}", text);
        Ok(())
    }
}

/// Relay stand-in that remembers and logs the commanded state.
#[derive(Debug, Default)]
pub struct LogActuator {
    on: bool,
}

impl LogActuator {
    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Actuator for LogActuator {
    fn set_state(&mut self, on: bool) {
        self.on = on;
        info!("RELAY: {}", if on { "ON" } else { "OFF" });
    }
}

/// Display stand-in; logs a frame only when its contents change.
#[derive(Debug, Default)]
pub struct LogDisplay {
    lines: (String, String),
}

impl LogDisplay {
    pub fn lines(&self) -> (&str, &str) {
        (self.lines.0.as_str(), self.lines.1.as_str())
    }
}

impl Display for LogDisplay {
    fn write_lines(&mut self, line1: &str, line2: &str) {
        if self.lines.0 == line1 && self.lines.1 == line2 {
            return;
        }
        self.lines = (line1.to_string(), line2.to_string());
        info!("DISPLAY: {} | {}", line1, line2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actuator_keeps_last_state() {
        let mut relay = LogActuator::default();
        assert!(!relay.is_on());
        relay.set_state(true);
        relay.set_state(true);
        assert!(relay.is_on());
        relay.set_state(false);
        assert!(!relay.is_on());
    }

    #[test]
    fn display_holds_latest_frame() {
        let mut display = LogDisplay::default();
        display.write_lines("Temp:     70.00F", "Humidity: 60.00%");
        display.write_lines("Timer mode", "Heater: ON");
        assert_eq!(display.lines(), ("Timer mode", "Heater: ON"));
    }

    #[tokio::test]
    async fn notifier_never_fails() {
        assert!(LogNotifier.send("Humidimon successfully started").await.is_ok());
    }
}
