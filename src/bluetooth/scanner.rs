/// RuuviTag sensor driver over Bluetooth Low Energy
use futures_util::StreamExt;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::bluetooth::decode::{decode_ruuvi_data, RUUVITAG_MANUFACTURER_ID};
use crate::drivers::Sensor;
use crate::error::SensorReadError;
use crate::models::Reading;
use crate::utils::{celsius_to_fahrenheit, round2};

fn transport(context: &str, e: impl std::fmt::Display) -> SensorReadError {
    error!("{}: {}", context, e);
    SensorReadError::Transport(format!("{}: {}", context, e))
}

/// Reads one configured RuuviTag from BlueZ's advertisement cache.
///
/// Discovery is started on the first read and kept running; later reads
/// only look up the latest manufacturer data for the tag.
pub struct RuuviSensor {
    address: bluer::Address,
    scan_duration: Duration,
    session: Option<bluer::Session>,
    adapter: Option<bluer::Adapter>,
    discovery: Option<JoinHandle<()>>,
}

impl RuuviSensor {
    pub fn new(mac: &str, scan_duration: Duration) -> Result<Self, SensorReadError> {
        let address = mac
            .parse::<bluer::Address>()
            .map_err(|e| SensorReadError::Transport(format!("invalid tag address {}: {}", mac, e)))?;

        Ok(RuuviSensor {
            address,
            scan_duration,
            session: None,
            adapter: None,
            discovery: None,
        })
    }

    async fn start_discovery(&mut self) -> Result<bluer::Adapter, SensorReadError> {
        // Initialize Bluetooth session
        let session = bluer::Session::new()
            .await
            .map_err(|e| transport("Failed to create Bluetooth session", e))?;

        // Get the default Bluetooth adapter
        let adapter = session
            .default_adapter()
            .await
            .map_err(|e| transport("Failed to get default Bluetooth adapter", e))?;

        // Ensure Bluetooth adapter is powered on
        adapter
            .set_powered(true)
            .await
            .map_err(|e| transport("Failed to power on adapter", e))?;

        // Configure discovery filter for Low Energy devices only
        let filter = bluer::DiscoveryFilter {
            transport: bluer::DiscoveryTransport::Le, // Bluetooth Low Energy only
            duplicate_data: true,                     // Keep advertisement data fresh
            ..Default::default()
        };

        // Apply the discovery filter (warn if it fails, but continue)
        if let Err(e) = adapter.set_discovery_filter(filter).await {
            warn!("Failed to set discovery filter: {}", e);
        }

        // Keep discovery running in background for the lifetime of the driver
        let discovery_stream = adapter
            .discover_devices()
            .await
            .map_err(|e| transport("Failed to start device discovery", e))?;
        let handle = tokio::spawn(async move {
            let mut stream = discovery_stream;
            while let Some(event) = stream.next().await {
                debug!("Discovery event: {:?}", event);
            }
        });

        // Held before the settle wait so a cancelled read cannot orphan the task
        self.session = Some(session);
        self.adapter = Some(adapter.clone());
        self.discovery = Some(handle);

        info!(
            "Scanning {:?} for RuuviTag {}",
            self.scan_duration, self.address
        );
        sleep(self.scan_duration).await;
        Ok(adapter)
    }

    async fn read_tag(&mut self) -> Result<Reading, SensorReadError> {
        let adapter = match &self.adapter {
            Some(adapter) => adapter.clone(),
            None => self.start_discovery().await?,
        };

        let device = adapter
            .device(self.address)
            .map_err(|e| transport("Tag not known to adapter", e))?;

        let manufacturer_data = device
            .manufacturer_data()
            .await
            .map_err(|e| transport("Failed to get manufacturer data", e))?
            .ok_or(SensorReadError::Missing)?;

        let payload = manufacturer_data
            .get(&RUUVITAG_MANUFACTURER_ID)
            .ok_or(SensorReadError::Missing)?;
        let data = decode_ruuvi_data(payload).ok_or(SensorReadError::Missing)?;

        debug!(
            "Received data from {}: temp={:.2}°C, humidity={:.2}%, pressure={:.2} hPa",
            self.address, data.temperature_c, data.humidity, data.pressure
        );

        Ok(Reading::new(
            round2(celsius_to_fahrenheit(data.temperature_c)),
            data.humidity,
        ))
    }
}

impl Sensor for RuuviSensor {
    async fn read(&mut self) -> Result<Reading, SensorReadError> {
        self.read_tag().await
    }
}

impl Drop for RuuviSensor {
    fn drop(&mut self) {
        if let Some(handle) = self.discovery.take() {
            handle.abort();
        }
    }
}
