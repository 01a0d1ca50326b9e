use log::{error, info};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::config::MonitorConfig;
use crate::control::context::{ControlContext, Peripherals};
use crate::control::failover::FailoverTimerLoop;
use crate::control::sensor_loop::{ControlLoop, TickOutcome};
use crate::drivers::{Actuator, Display, Notifier, Sensor, Storage};
use crate::models::{Mode, StatusSnapshot};

pub const STARTUP_MESSAGE: &str = "Humidimon successfully started";

/// Owns the control state and the single active timer chain.
///
/// Sensor mode and timer mode run one after the other inside one future, so
/// leaving sensor mode drops its pending tick before the duty cycle starts.
pub struct Coordinator<S, A, D, N, P> {
    control: ControlLoop,
    failover: FailoverTimerLoop,
    ctx: ControlContext<A>,
    io: Peripherals<S, D, N, P>,
    started: bool,
}

impl<S, A, D, N, P> Coordinator<S, A, D, N, P>
where
    S: Sensor,
    A: Actuator,
    D: Display,
    N: Notifier,
    P: Storage,
{
    pub fn new(
        config: &MonitorConfig,
        sensor: S,
        actuator: A,
        display: D,
        notifier: N,
        storage: P,
    ) -> Self {
        Coordinator {
            control: ControlLoop::new(config),
            failover: FailoverTimerLoop::new(config),
            ctx: ControlContext::new(actuator),
            io: Peripherals {
                sensor,
                display,
                notifier,
                storage: Arc::new(storage),
            },
            started: false,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.ctx.subscribe()
    }

    pub fn mode(&self) -> Mode {
        self.ctx.mode
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.ctx.snapshot()
    }

    pub fn sensor(&self) -> &S {
        &self.io.sensor
    }

    pub fn actuator(&self) -> &A {
        self.ctx.relay.actuator()
    }

    pub fn display(&self) -> &D {
        &self.io.display
    }

    pub fn notifier(&self) -> &N {
        &self.io.notifier
    }

    /// Drive the relay until `shutdown` resolves. The relay keeps its last
    /// commanded state afterwards.
    ///
    /// Calling `run` again resumes where the previous call stopped: once in
    /// timer mode the sensor is never polled again.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = shutdown => {}
            _ = self.drive() => {}
        }

        info!(
            "Control stopped in {} mode, relay left {}",
            self.ctx.mode,
            if self.ctx.relay.is_on() { "ON" } else { "OFF" }
        );
    }

    async fn drive(&mut self) {
        if !self.started {
            self.started = true;
            let at = self.ctx.now();
            self.ctx.relay.set(false, at);
            self.ctx.publish();
            if let Err(e) = self.io.notifier.send(STARTUP_MESSAGE).await {
                error!("{}", e);
            }
        }

        while self.ctx.mode == Mode::SensorMode {
            let outcome = self.control.tick(&mut self.ctx, &mut self.io).await;
            self.ctx.publish();
            if outcome == TickOutcome::Failover {
                self.ctx.mode = Mode::TimerMode;
                self.ctx.publish();
                break;
            }
            sleep(self.control.poll_interval()).await;
        }

        self.failover.run(&mut self.ctx, &mut self.io).await;
    }
}
