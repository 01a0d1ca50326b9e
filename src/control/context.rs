use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::control::relay::Relay;
use crate::control::stats::StatsTracker;
use crate::drivers::Actuator;
use crate::models::{Mode, Reading, StatusSnapshot};

/// Mutable control state, owned by the coordinator and lent to one loop at a time.
pub struct ControlContext<A> {
    pub mode: Mode,
    pub reading: Option<Reading>,
    pub stats: StatsTracker,
    pub relay: Relay<A>,
    status: watch::Sender<StatusSnapshot>,
    started_at: OffsetDateTime,
    started: Instant,
}

impl<A: Actuator> ControlContext<A> {
    pub fn new(actuator: A) -> Self {
        let (status, _) = watch::channel(StatusSnapshot::default());
        ControlContext {
            mode: Mode::SensorMode,
            reading: None,
            stats: StatsTracker::new(),
            relay: Relay::new(actuator),
            status,
            started_at: OffsetDateTime::now_utc(),
            started: Instant::now(),
        }
    }

    /// Wall-clock time advanced by the runtime's monotonic clock.
    pub fn now(&self) -> OffsetDateTime {
        self.started_at + self.started.elapsed()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.subscribe()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        let history = self.relay.history();
        StatusSnapshot {
            mode: self.mode,
            reading: self.reading,
            stats: *self.stats.stats(),
            relay_log: history.entries().to_vec(),
            average_on: history.average_duration(true),
            average_off: history.average_duration(false),
        }
    }

    /// Push the current state to status subscribers.
    pub fn publish(&self) {
        self.status.send_replace(self.snapshot());
    }
}

/// Non-actuator collaborators. Storage is shared so appends can run off the tick.
pub struct Peripherals<S, D, N, P> {
    pub sensor: S,
    pub display: D,
    pub notifier: N,
    pub storage: Arc<P>,
}
