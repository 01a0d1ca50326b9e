pub mod context;
pub mod coordinator;
pub mod failover;
pub mod hysteresis;
pub mod relay;
pub mod relay_history;
pub mod sensor_loop;
pub mod stats;
pub mod throttle;
pub mod triggers;

pub use coordinator::Coordinator;
pub use hysteresis::HysteresisController;
pub use relay_history::RelayHistory;
pub use sensor_loop::{ControlLoop, TickOutcome};
pub use stats::StatsTracker;
pub use throttle::{AlertThrottle, SendOutcome};
