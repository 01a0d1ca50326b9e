use log::info;
use time::OffsetDateTime;

use crate::control::relay_history::RelayHistory;
use crate::drivers::Actuator;

/// Sole writer to the actuator. Every write is followed by a history entry.
pub struct Relay<A> {
    actuator: A,
    history: RelayHistory,
    on: bool,
}

impl<A: Actuator> Relay<A> {
    /// The actuator is assumed off until the first `set`.
    pub fn new(actuator: A) -> Self {
        Relay {
            actuator,
            history: RelayHistory::new(),
            on: false,
        }
    }

    pub fn set(&mut self, on: bool, at: OffsetDateTime) {
        self.actuator.set_state(on);
        self.on = on;
        self.history.record(on, at);
        info!("Relay switched {}", if on { "ON" } else { "OFF" });
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn history(&self) -> &RelayHistory {
        &self.history
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}
