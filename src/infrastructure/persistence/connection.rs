use std::str::FromStr;

use base64::{engine::general_purpose, Engine as _};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::domain::models::StoreEndpoint;
use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

const MAX_CONNECTIONS: u32 = 2;

/// Manages the checkpoint store connection pool
pub struct DbPool {
    connection: DatabaseConnection,
}

impl DbPool {
    /// Connect to the store described by the endpoint
    pub async fn connect(endpoint: &StoreEndpoint) -> Result<Self, DbError> {
        logging::log_database_connection_details(&endpoint.url);

        let mut options = PgConnectOptions::from_str(&endpoint.url)
            .map_err(|e| DbError::ConfigError(format!("Invalid checkpoint store URL: {}", e)))?;

        if let Some(ca_certificate) = &endpoint.ca_certificate {
            options = options.ssl_root_cert_from_pem(decode_certificate(ca_certificate)?);
        }

        match PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
        {
            Ok(pool) => {
                logging::log_info("Checkpoint store connection established successfully");
                Ok(DbPool {
                    connection: SqlxPostgresConnector::from_sqlx_postgres_pool(pool),
                })
            }
            Err(e) => {
                logging::log_error(&format!("Failed to connect to checkpoint store: {}", e));
                Err(DbError::ConnectionError(format!(
                    "Failed to connect to checkpoint store: {}",
                    e
                )))
            }
        }
    }

    /// Returns the database connection
    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

fn decode_certificate(encoded: &str) -> Result<Vec<u8>, DbError> {
    general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| DbError::ConfigError(format!("CA certificate is not valid base64: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_base64_certificate() {
        let pem = "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        let encoded = general_purpose::STANDARD.encode(pem);
        assert_eq!(decode_certificate(&encoded).unwrap(), pem.as_bytes());
    }

    #[test]
    fn rejects_invalid_base64_certificate() {
        assert!(matches!(
            decode_certificate("not base64!"),
            Err(DbError::ConfigError(_))
        ));
    }
}
