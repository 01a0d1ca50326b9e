pub mod lcd;
pub mod relay;

pub use lcd::LcdDisplay;
pub use relay::GpioRelay;
