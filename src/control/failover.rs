use log::{error, warn};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::MonitorConfig;
use crate::control::context::{ControlContext, Peripherals};
use crate::drivers::{Actuator, Display, Notifier};
use crate::models::DeviceMode;
use crate::utils::format_duration;

/// Fixed duty cycle that drives the relay without any sensor input.
///
/// OFF for `off_duration`, ON for `on_duration`, forever.
#[derive(Debug, Clone)]
pub struct FailoverTimerLoop {
    device_mode: DeviceMode,
    on_duration: Duration,
    off_duration: Duration,
}

impl FailoverTimerLoop {
    pub fn new(config: &MonitorConfig) -> Self {
        FailoverTimerLoop {
            device_mode: config.device_mode,
            on_duration: config.timer_on,
            off_duration: config.timer_off,
        }
    }

    /// Runs until the future is dropped.
    pub async fn run<S, A, D, N, P>(
        &self,
        ctx: &mut ControlContext<A>,
        io: &mut Peripherals<S, D, N, P>,
    ) where
        A: Actuator,
        D: Display,
        N: Notifier,
    {
        warn!(
            "Timer mode: cycling {} {:?} off / {:?} on",
            self.device_mode.label(),
            self.off_duration,
            self.on_duration
        );

        loop {
            self.transition(false, ctx, io).await;
            sleep(self.off_duration).await;
            self.transition(true, ctx, io).await;
            sleep(self.on_duration).await;
        }
    }

    async fn transition<S, A, D, N, P>(
        &self,
        on: bool,
        ctx: &mut ControlContext<A>,
        io: &mut Peripherals<S, D, N, P>,
    ) where
        A: Actuator,
        D: Display,
        N: Notifier,
    {
        let state = if on { "ON" } else { "OFF" };
        let hold = if on { self.on_duration } else { self.off_duration };

        let at = ctx.now();
        ctx.relay.set(on, at);
        ctx.stats.set_power_switch(on);
        io.display
            .write_lines("Timer mode", &format!("{}: {}", self.device_mode.label(), state));

        let message = format!(
            "Timer mode: {} turned {} for {}",
            self.device_mode.label(),
            state,
            format_duration(time::Duration::seconds(hold.as_secs() as i64))
        );
        if let Err(e) = io.notifier.send(&message).await {
            error!("{}", e);
        }
        ctx.publish();
    }
}
