pub mod connection;
pub mod csv;
pub mod operations;

use log::{info, warn};

use crate::config::MonitorConfig;
use crate::drivers::Storage;
use crate::error::PersistenceError;
use crate::models::Reading;

pub use connection::create_ssl_connector;
pub use csv::CsvStorage;
pub use operations::PostgresStorage;

/// Storage backend chosen at startup: PostgreSQL when configured, else CSV.
pub enum ReadingStore {
    Postgres(PostgresStorage),
    Csv(CsvStorage),
}

impl ReadingStore {
    pub async fn from_config(config: &MonitorConfig) -> Self {
        match &config.database_url {
            Some(url) => {
                let storage = PostgresStorage::new(url.clone());
                if let Err(e) = storage.ensure_schema().await {
                    warn!("Could not prepare readings table: {}", e);
                }
                info!("Storing readings in PostgreSQL");
                ReadingStore::Postgres(storage)
            }
            None => {
                info!("Storing readings in {}", config.csv_path.display());
                ReadingStore::Csv(CsvStorage::new(config.csv_path.clone()))
            }
        }
    }
}

impl Storage for ReadingStore {
    async fn append(&self, reading: &Reading) -> Result<(), PersistenceError> {
        match self {
            ReadingStore::Postgres(storage) => storage.append(reading).await,
            ReadingStore::Csv(storage) => storage.append(reading).await,
        }
    }
}
