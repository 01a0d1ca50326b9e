use log::debug;
use rppal::gpio::{Gpio, OutputPin};

use crate::drivers::Actuator;

/// Relay on a BCM GPIO pin, active high.
pub struct GpioRelay {
    pin: OutputPin,
}

impl GpioRelay {
    pub fn new(bcm_pin: u8) -> Result<Self, rppal::gpio::Error> {
        let mut pin = Gpio::new()?.get(bcm_pin)?.into_output_low();
        // Shutdown must leave the relay in its last commanded state.
        pin.set_reset_on_drop(false);
        Ok(GpioRelay { pin })
    }
}

impl Actuator for GpioRelay {
    fn set_state(&mut self, on: bool) {
        debug!("GPIO {} -> {}", self.pin.pin(), on);
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
