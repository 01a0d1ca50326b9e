/// RuuviTag advertisement decoding
use log::warn;

// RuuviTag protocol constants
pub const RUUVITAG_MANUFACTURER_ID: u16 = 0x0499; // Ruuvi Innovations Ltd. manufacturer ID
const DATA_FORMAT: u8 = 5; // RuuviTag data format version 5
const PAYLOAD_LEN: usize = 24;

/// Raw environmental values from one advertisement, in sensor units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuuviData {
    pub temperature_c: f32,
    pub humidity: f32,
    pub pressure: f32,
}

/// Decode RuuviTag manufacturer data format 5
///
/// RuuviTag data format 5 uses a 24-byte payload with the following structure:
/// - Byte 0: Data format (5)
/// - Bytes 1-2: Temperature (signed 16-bit, 0.005°C resolution)
/// - Bytes 3-4: Humidity (unsigned 16-bit, 0.0025% resolution)
/// - Bytes 5-6: Pressure (unsigned 16-bit, +50000 Pa offset, 1 Pa resolution)
/// - Bytes 7-23: Acceleration, battery, counters and MAC (not used here)
///
/// The format reserves 0x8000 (temperature) and 0xFFFF (humidity) for
/// "not available"; those decode to `None`.
pub fn decode_ruuvi_data(data: &[u8]) -> Option<RuuviData> {
    if data.len() != PAYLOAD_LEN || data[0] != DATA_FORMAT {
        if !data.is_empty() {
            warn!(
                "Invalid RuuviTag data: len={}, format={}",
                data.len(),
                data[0]
            );
        }
        return None;
    }

    let raw_temperature = i16::from_be_bytes([data[1], data[2]]);
    let raw_humidity = u16::from_be_bytes([data[3], data[4]]);
    if raw_temperature == i16::MIN || raw_humidity == u16::MAX {
        return None;
    }

    // Decode temperature: signed 16-bit integer * 0.005°C
    let temperature_c = raw_temperature as f32 * 0.005;

    // Decode humidity: unsigned 16-bit integer * 0.0025%, capped at 100%
    let humidity = (raw_humidity as f32 * 0.0025).min(100.0);

    // Decode pressure: unsigned 16-bit integer + 50000 Pa, convert to hPa
    let pressure = (u16::from_be_bytes([data[5], data[6]]) as f32 + 50000.0) / 100.0;

    Some(RuuviData {
        temperature_c: (temperature_c * 100.0).round() / 100.0,
        humidity: (humidity * 100.0).round() / 100.0,
        pressure: (pressure * 100.0).round() / 100.0,
    })
}
