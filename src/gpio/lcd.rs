/// HD44780 16x2 character LCD behind a PCF8574 I2C backpack
use log::warn;
use rppal::i2c::I2c;
use std::thread;
use std::time::Duration;

use crate::drivers::Display;

const COLUMNS: usize = 16;
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

// PCF8574 bit layout: P0 = RS, P2 = EN, P3 = backlight, P4-P7 = data
const REGISTER_SELECT: u8 = 0x01;
const ENABLE: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 commands
const CLEAR_DISPLAY: u8 = 0x01;
const ENTRY_MODE_INCREMENT: u8 = 0x06;
const DISPLAY_ON: u8 = 0x0C;
const FUNCTION_SET_4BIT_2LINE: u8 = 0x28;
const SET_DDRAM_ADDRESS: u8 = 0x80;

pub struct LcdDisplay {
    bus: I2c,
}

impl LcdDisplay {
    pub fn new(address: u16) -> Result<Self, rppal::i2c::Error> {
        let mut bus = I2c::new()?;
        bus.set_slave_address(address)?;
        let mut lcd = LcdDisplay { bus };
        lcd.init()?;
        Ok(lcd)
    }

    fn init(&mut self) -> Result<(), rppal::i2c::Error> {
        thread::sleep(Duration::from_millis(50));

        // Force 8-bit mode three times, then switch to 4-bit
        for wait in [4_500, 4_500, 150] {
            self.write_nibble(0x30, 0)?;
            thread::sleep(Duration::from_micros(wait));
        }
        self.write_nibble(0x20, 0)?;

        self.command(FUNCTION_SET_4BIT_2LINE)?;
        self.command(DISPLAY_ON)?;
        self.command(CLEAR_DISPLAY)?;
        thread::sleep(Duration::from_millis(2));
        self.command(ENTRY_MODE_INCREMENT)
    }

    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), rppal::i2c::Error> {
        let data = (nibble & 0xF0) | mode | BACKLIGHT;
        self.bus.write(&[data | ENABLE])?;
        thread::sleep(Duration::from_micros(1));
        self.bus.write(&[data & !ENABLE])?;
        thread::sleep(Duration::from_micros(50));
        Ok(())
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), rppal::i2c::Error> {
        self.write_nibble(value & 0xF0, mode)?;
        self.write_nibble(value << 4, mode)
    }

    fn command(&mut self, value: u8) -> Result<(), rppal::i2c::Error> {
        self.send(value, 0)
    }

    fn print_line(&mut self, row: usize, text: &str) -> Result<(), rppal::i2c::Error> {
        self.bus.write(&line_frames(row, text))?;
        Ok(())
    }
}

/// Expander bytes for one nibble: enable high, then low.
fn push_nibble(frames: &mut Vec<u8>, nibble: u8, mode: u8) {
    let data = (nibble & 0xF0) | mode | BACKLIGHT;
    frames.push(data | ENABLE);
    frames.push(data & !ENABLE);
}

/// A whole row as one I2C transfer. At 100 kHz each byte takes ~90 us on the
/// bus, which covers the enable pulse width and per-character execution time.
fn line_frames(row: usize, text: &str) -> Vec<u8> {
    let mut frames = Vec::with_capacity((COLUMNS + 1) * 4);
    let address = SET_DDRAM_ADDRESS | ROW_OFFSETS[row];
    push_nibble(&mut frames, address & 0xF0, 0);
    push_nibble(&mut frames, address << 4, 0);
    for byte in fit_line(text) {
        push_nibble(&mut frames, byte & 0xF0, REGISTER_SELECT);
        push_nibble(&mut frames, byte << 4, REGISTER_SELECT);
    }
    frames
}

/// Pad or truncate to the panel width; non-ASCII becomes `?`.
fn fit_line(text: &str) -> [u8; COLUMNS] {
    let mut line = [b' '; COLUMNS];
    for (slot, ch) in line.iter_mut().zip(text.chars()) {
        *slot = if ch.is_ascii() { ch as u8 } else { b'?' };
    }
    line
}

impl Display for LcdDisplay {
    fn write_lines(&mut self, line1: &str, line2: &str) {
        if let Err(e) = self
            .print_line(0, line1)
            .and_then(|_| self.print_line(1, line2))
        {
            warn!("LCD write failed: {}", e);
        }
    }
}
