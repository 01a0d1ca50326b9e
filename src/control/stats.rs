use time::OffsetDateTime;

use crate::models::Stats;

/// Running min/max/average and read counters.
///
/// The average is the recency-weighted mean `avg' = (avg + new) / 2`, seeded
/// with the first reading. It is order dependent.
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: Stats,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a validated reading into the statistics.
    pub fn record(&mut self, temperature: f32, humidity: f32) -> Stats {
        let stats = &mut self.stats;

        let avg_t = stats.avg_temperature.unwrap_or(temperature);
        let avg_h = stats.avg_humidity.unwrap_or(humidity);

        stats.max_temperature = stats.max_temperature.max(temperature);
        stats.min_temperature = stats.min_temperature.min(temperature);
        stats.max_humidity = stats.max_humidity.max(humidity);
        stats.min_humidity = stats.min_humidity.min(humidity);

        stats.avg_temperature = Some((avg_t + temperature) / 2.0);
        stats.avg_humidity = Some((avg_h + humidity) / 2.0);

        stats.read_count += 1;
        *stats
    }

    pub fn record_error(&mut self) -> u64 {
        self.stats.error_count += 1;
        self.stats.error_count
    }

    pub fn set_power_switch(&mut self, on: bool) {
        self.stats.power_switch = on;
    }

    pub fn touch(&mut self, at: OffsetDateTime) {
        self.stats.last_updated = Some(at);
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }
}
