/// Append-only CSV file of readings
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::drivers::Storage;
use crate::error::PersistenceError;
use crate::models::Reading;
use crate::utils::{format_iso9075, round2};

const HEADER: &str = "time,temperature,humidity\n";

#[derive(Debug)]
pub struct CsvStorage {
    path: PathBuf,
    // Serializes appends so rows never interleave.
    write_lock: Mutex<()>,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStorage {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn row(reading: &Reading) -> String {
        format!(
            "{},{},{}\n",
            format_iso9075(&reading.read_at),
            round2(reading.temperature),
            round2(reading.humidity)
        )
    }
}

impl Storage for CsvStorage {
    async fn append(&self, reading: &Reading) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let mut contents = String::new();
        if file.metadata().await?.len() == 0 {
            contents.push_str(HEADER);
        }
        contents.push_str(&Self::row(reading));

        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
