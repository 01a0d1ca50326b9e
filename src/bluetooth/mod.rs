pub mod decode;
#[cfg(feature = "ble")]
pub mod scanner;

pub use decode::{decode_ruuvi_data, RuuviData};
#[cfg(feature = "ble")]
pub use scanner::RuuviSensor;
