use log::{error, info, warn};

use humidimon::bluetooth::RuuviSensor;
use humidimon::config::MonitorConfig;
use humidimon::control::Coordinator;
use humidimon::database::ReadingStore;
use humidimon::drivers::{Actuator, Display};
use humidimon::error::ConfigError;
use humidimon::notify::OperatorNotifier;

#[cfg(feature = "gpio")]
fn relay_and_display(config: &MonitorConfig) -> anyhow::Result<(impl Actuator, impl Display)> {
    use anyhow::Context;
    use humidimon::gpio::{GpioRelay, LcdDisplay};

    let relay = GpioRelay::new(config.relay_gpio)
        .with_context(|| format!("Failed to claim relay GPIO {}", config.relay_gpio))?;
    let display = LcdDisplay::new(config.lcd_address)
        .with_context(|| format!("Failed to open LCD at {:#04x}", config.lcd_address))?;
    Ok((relay, display))
}

#[cfg(not(feature = "gpio"))]
fn relay_and_display(_config: &MonitorConfig) -> anyhow::Result<(impl Actuator, impl Display)> {
    use humidimon::drivers::{LogActuator, LogDisplay};

    warn!("Built without GPIO support, relay and display are only logged");
    Ok((LogActuator::default(), LogDisplay::default()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let tag = config
        .ruuvi_tag
        .clone()
        .ok_or_else(|| ConfigError::Missing("RUUVI_TAG".to_string()))?;
    let sensor = RuuviSensor::new(&tag, config.scan_duration)?;
    let (relay, display) = relay_and_display(&config)?;
    let notifier = OperatorNotifier::from_config(config.twilio.clone());
    let storage = ReadingStore::from_config(&config).await;

    let mut coordinator = Coordinator::new(&config, sensor, relay, display, notifier, storage);

    // Handle Ctrl+C gracefully
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Program terminated by user. Exiting gracefully.");
    };

    info!("Starting Humidimon for RuuviTag {}", tag);
    coordinator.run(shutdown).await;

    Ok(())
}
