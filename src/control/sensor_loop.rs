use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

use crate::config::{Bounds, ErrorCounting, MonitorConfig};
use crate::control::context::{ControlContext, Peripherals};
use crate::control::hysteresis::HysteresisController;
use crate::control::throttle::AlertThrottle;
use crate::control::triggers::{alert_message, triggers_for, Trigger};
use crate::drivers::{Actuator, Display, Notifier, Sensor, Storage};
use crate::error::SensorReadError;
use crate::models::{Action, DeviceMode, Metric, Reading};
use crate::utils::{format_datetime, format_stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep polling after the poll interval.
    Continue,
    /// The failure threshold was reached; sensor mode is over.
    Failover,
}

/// One iteration of sensor mode: poll, evaluate or count the failure.
pub struct ControlLoop {
    device_mode: DeviceMode,
    triggers: &'static [Trigger],
    controller: HysteresisController,
    throttle: AlertThrottle,
    throttle_window: Duration,
    temperature_alert: Bounds,
    humidity_alert: Bounds,
    poll_interval: Duration,
    sensor_timeout: Duration,
    db_interval: Duration,
    error_threshold: u32,
    error_counting: ErrorCounting,
    consecutive_failures: u32,
    last_persisted: Option<Instant>,
}

impl ControlLoop {
    pub fn new(config: &MonitorConfig) -> Self {
        ControlLoop {
            device_mode: config.device_mode,
            triggers: triggers_for(config.device_mode),
            controller: HysteresisController::new(config.trigger),
            throttle: AlertThrottle::new(),
            throttle_window: config.throttle_window,
            temperature_alert: config.temperature_alert,
            humidity_alert: config.humidity_alert,
            poll_interval: config.poll_interval,
            sensor_timeout: config.sensor_timeout,
            db_interval: config.db_interval,
            error_threshold: config.error_threshold,
            error_counting: config.error_counting,
            consecutive_failures: 0,
            last_persisted: None,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub async fn tick<S, A, D, N, P>(
        &mut self,
        ctx: &mut ControlContext<A>,
        io: &mut Peripherals<S, D, N, P>,
    ) -> TickOutcome
    where
        S: Sensor,
        A: Actuator,
        D: Display,
        N: Notifier,
        P: Storage,
    {
        match self.poll(&mut io.sensor).await {
            Ok(reading) => {
                self.evaluate(reading, ctx, io).await;
                TickOutcome::Continue
            }
            Err(e) => self.handle_failure(e, ctx, &io.notifier).await,
        }
    }

    async fn poll<S: Sensor>(&self, sensor: &mut S) -> Result<Reading, SensorReadError> {
        let reading = timeout(self.sensor_timeout, sensor.read())
            .await
            .map_err(|_| SensorReadError::Timeout(self.sensor_timeout))??;

        if !reading.is_valid() {
            return Err(SensorReadError::Missing);
        }
        Ok(reading)
    }

    async fn evaluate<S, A, D, N, P>(
        &mut self,
        reading: Reading,
        ctx: &mut ControlContext<A>,
        io: &mut Peripherals<S, D, N, P>,
    ) where
        A: Actuator,
        D: Display,
        N: Notifier,
        P: Storage,
    {
        self.consecutive_failures = 0;
        ctx.reading = Some(reading);
        ctx.stats.record(reading.temperature, reading.humidity);
        ctx.stats.set_power_switch(ctx.relay.is_on());
        let now = ctx.now();
        ctx.stats.touch(now);

        io.display.write_lines(
            &format!("Temp:     {:.2}F", reading.temperature),
            &format!("Humidity: {:.2}%", reading.humidity),
        );
        self.log_summary(&reading, ctx);

        for trigger in self.triggers {
            self.run_trigger(*trigger, &reading, ctx, &io.notifier).await;
        }

        self.persist(reading, &io.storage);
    }

    async fn run_trigger<A, N>(
        &self,
        trigger: Trigger,
        reading: &Reading,
        ctx: &mut ControlContext<A>,
        notifier: &N,
    ) where
        A: Actuator,
        N: Notifier,
    {
        match trigger {
            Trigger::Alert(metric) => {
                let bounds = match metric {
                    Metric::Temperature => self.temperature_alert,
                    Metric::Humidity => self.humidity_alert,
                };
                if let Some(message) = alert_message(metric, reading.value(metric), bounds) {
                    self.throttle
                        .try_send(notifier, metric, &message, self.throttle_window)
                        .await;
                }
            }
            Trigger::SwitchOn(metric) => {
                let value = reading.value(metric);
                if self.controller.evaluate(value, ctx.relay.is_on()) == Action::TurnOn {
                    self.switch(true, metric, value, ctx, notifier).await;
                }
            }
            Trigger::SwitchOff(metric) => {
                let value = reading.value(metric);
                if self.controller.evaluate(value, ctx.relay.is_on()) == Action::TurnOff {
                    self.switch(false, metric, value, ctx, notifier).await;
                }
            }
        }
    }

    async fn switch<A: Actuator, N: Notifier>(
        &self,
        on: bool,
        metric: Metric,
        value: f32,
        ctx: &mut ControlContext<A>,
        notifier: &N,
    ) {
        let at = ctx.now();
        ctx.relay.set(on, at);
        ctx.stats.set_power_switch(on);

        let message = format!(
            "{} turned {} ({:.2}{})",
            self.device_mode.label(),
            if on { "ON" } else { "OFF" },
            value,
            metric.unit()
        );
        if let Err(e) = notifier.send(&message).await {
            error!("{}", e);
        }
    }

    async fn handle_failure<A: Actuator, N: Notifier>(
        &mut self,
        err: SensorReadError,
        ctx: &mut ControlContext<A>,
        notifier: &N,
    ) -> TickOutcome {
        let total = ctx.stats.record_error();
        self.consecutive_failures += 1;

        let counted = match self.error_counting {
            ErrorCounting::Consecutive => u64::from(self.consecutive_failures),
            ErrorCounting::Cumulative => total,
        };
        warn!(
            "Sensor read failed ({}/{}): {}",
            counted, self.error_threshold, err
        );

        if counted < u64::from(self.error_threshold) {
            return TickOutcome::Continue;
        }

        let message = format!(
            "Sensor failed {} times, switching {} to timer mode",
            counted,
            self.device_mode.label()
        );
        error!("{}", message);
        if let Err(e) = notifier.send(&message).await {
            error!("{}", e);
        }
        TickOutcome::Failover
    }

    /// Spawn an append if the storage interval has passed; never awaited by the tick.
    fn persist<P: Storage>(&mut self, reading: Reading, storage: &Arc<P>) {
        if let Some(last) = self.last_persisted {
            if last.elapsed() < self.db_interval {
                return;
            }
        }
        self.last_persisted = Some(Instant::now());

        let storage = Arc::clone(storage);
        tokio::spawn(async move {
            match storage.append(&reading).await {
                Ok(()) => debug!("Stored reading from {}", format_datetime(&reading.read_at)),
                Err(e) => error!("{}", e),
            }
        });
    }

    fn log_summary<A: Actuator>(&self, reading: &Reading, ctx: &ControlContext<A>) {
        let stats = ctx.stats.stats();
        info!(
            "\n\
-------------------------------------------------------------------------------
Temperature: {:.2}F | Humidity: {:.2}%
{}: {}
Temperature min/avg/max: {} / {} / {}
Humidity min/avg/max: {} / {} / {}
Reads: {} | Errors: {}
-------------------------------------------------------------------------------",
            reading.temperature,
            reading.humidity,
            self.device_mode.label(),
            if ctx.relay.is_on() { "on" } else { "off" },
            format_stat(stats.min_temperature),
            format_stat(stats.avg_temperature.unwrap_or(f32::NAN)),
            format_stat(stats.max_temperature),
            format_stat(stats.min_humidity),
            format_stat(stats.avg_humidity.unwrap_or(f32::NAN)),
            format_stat(stats.max_humidity),
            stats.read_count,
            stats.error_count,
        );
    }
}
