use log::error;
use openssl::ssl::{SslConnector, SslConnectorBuilder, SslMethod, SslVerifyMode};
use postgres_openssl::MakeTlsConnector;
use url::Url;

use crate::error::PersistenceError;

pub fn create_ssl_connector(sslrootcert_path: &str) -> Result<MakeTlsConnector, String> {
    let mut builder = verifying_builder()?;

    // The self-signed server root is trusted through the CA file
    builder
        .set_ca_file(sslrootcert_path)
        .map_err(|e| format!("Error loading CA cert: {}", e))?;

    Ok(MakeTlsConnector::new(builder.build()))
}

fn verifying_builder() -> Result<SslConnectorBuilder, String> {
    let mut builder =
        SslConnector::builder(SslMethod::tls()).map_err(|e| format!("SSL builder error: {}", e))?;
    builder.set_verify(SslVerifyMode::PEER);
    Ok(builder)
}

/// Split the `sslrootcert` parameter out of a connection url.
///
/// tokio-postgres rejects the parameter, so it is removed and returned
/// separately along with the cleaned url.
pub fn split_sslrootcert(database_url: &str) -> Result<(String, String), String> {
    let url = Url::parse(database_url).map_err(|e| format!("URL parse error: {}", e))?;

    let mut sslrootcert_path = None;
    let mut clean_params = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == "sslrootcert" {
            sslrootcert_path = Some(value.to_string());
        } else {
            clean_params.push((key.into_owned(), value.into_owned()));
        }
    }

    let sslrootcert_path = sslrootcert_path.ok_or("sslrootcert parameter missing")?;

    let mut clean_url = url.clone();
    clean_url.set_query(None);
    if !clean_params.is_empty() {
        let query = clean_params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        clean_url.set_query(Some(&query));
    }

    Ok((clean_url.to_string(), sslrootcert_path))
}

/// Connect once and run `operation`. Failures are returned, not retried.
pub async fn execute_once<F, Fut>(database_url: &str, operation: F) -> Result<u64, PersistenceError>
where
    F: FnOnce(tokio_postgres::Client) -> Fut + Send,
    Fut: std::future::Future<Output = Result<u64, tokio_postgres::Error>> + Send,
{
    let (clean_database_url, sslrootcert_path) =
        split_sslrootcert(database_url).map_err(PersistenceError)?;
    let connector = create_ssl_connector(&sslrootcert_path).map_err(PersistenceError)?;

    let (client, connection) = tokio_postgres::connect(&clean_database_url, connector)
        .await
        .map_err(|e| PersistenceError(format!("Connection error: {}", e)))?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("Connection error: {}", e);
        }
    });

    operation(client)
        .await
        .map_err(|e| PersistenceError(format!("Query error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sslrootcert_and_keeps_other_params() {
        let (url, cert) = split_sslrootcert(
            "postgres://user:pw@db.local:5432/sensors?sslmode=require&sslrootcert=/etc/ca.pem",
        )
        .unwrap();
        assert_eq!(url, "postgres://user:pw@db.local:5432/sensors?sslmode=require");
        assert_eq!(cert, "/etc/ca.pem");
    }

    #[test]
    fn connector_verifies_server_certificate() {
        let context = verifying_builder().unwrap().build().into_context();
        assert_eq!(context.verify_mode(), SslVerifyMode::PEER);
    }

    #[test]
    fn missing_ca_file_is_an_error() {
        let err = create_ssl_connector("/nonexistent/humidimon-ca.pem").err().unwrap();
        assert!(err.starts_with("Error loading CA cert"));
    }

    #[test]
    fn requires_sslrootcert() {
        let err = split_sslrootcert("postgres://user@db.local/sensors").unwrap_err();
        assert_eq!(err, "sslrootcert parameter missing");
    }
}
