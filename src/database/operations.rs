/// PostgreSQL persistence for readings
use crate::database::connection::execute_once;
use crate::drivers::Storage;
use crate::error::PersistenceError;
use crate::models::Reading;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS readings(
    time TIMESTAMPTZ NOT NULL,
    temperature REAL NOT NULL,
    humidity REAL NOT NULL
)";

#[derive(Debug, Clone)]
pub struct PostgresStorage {
    database_url: String,
}

impl PostgresStorage {
    pub fn new(database_url: impl Into<String>) -> Self {
        PostgresStorage {
            database_url: database_url.into(),
        }
    }

    /// Create the readings table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        execute_once(&self.database_url, |client| async move {
            client.execute(CREATE_TABLE, &[]).await
        })
        .await
        .map(|_| ())
    }
}

impl Storage for PostgresStorage {
    /// Insert one reading into the readings table
    async fn append(&self, reading: &Reading) -> Result<(), PersistenceError> {
        let reading = *reading;

        execute_once(&self.database_url, move |client| async move {
            client
                .execute(
                    "INSERT INTO readings(time, temperature, humidity) VALUES ($1, $2, $3)",
                    &[&reading.read_at, &reading.temperature, &reading.humidity],
                )
                .await
        })
        .await
        .map(|_| ())
    }
}
