use time::OffsetDateTime;

use crate::models::RelayLogEntry;
use crate::utils::format_duration;

/// Append-only log of relay transitions.
///
/// Each entry is an open interval until the next transition closes it; the
/// newest entry therefore never has a duration.
#[derive(Debug, Default, Clone)]
pub struct RelayHistory {
    entries: Vec<RelayLogEntry>,
}

impl RelayHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the open entry and start a new one at `at`.
    pub fn record(&mut self, on: bool, at: OffsetDateTime) {
        if let Some(previous) = self.entries.last_mut() {
            let interval = at - previous.timestamp;
            previous.interval = Some(interval);
            previous.seconds = interval.whole_seconds();
            previous.duration = format_duration(interval);
        }

        self.entries.push(RelayLogEntry {
            on,
            timestamp: at,
            interval: None,
            seconds: 0,
            duration: String::new(),
        });
    }

    pub fn entries(&self) -> &[RelayLogEntry] {
        &self.entries
    }

    /// Mean length of closed ON (or OFF) intervals.
    pub fn average_duration(&self, on: bool) -> Option<time::Duration> {
        let closed: Vec<time::Duration> = self
            .entries
            .iter()
            .filter(|entry| entry.on == on)
            .filter_map(|entry| entry.interval)
            .collect();

        if closed.is_empty() {
            return None;
        }
        let total: time::Duration = closed.iter().copied().sum();
        Some(total / closed.len() as u32)
    }
}
