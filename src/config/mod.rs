use dotenv::dotenv;
use std::env;
use std::fs;
use std::time::Duration;

use crate::domain::models::{ConnectionProfile, Credentials, ProcessingRequest, StoreEndpoint};
use crate::utils::logging;

/// Configuration for the checkpoint store
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: Option<String>,
    /// Base64-encoded CA certificate for TLS
    pub ca_certificate: Option<String>,
}

/// Configuration for the ledger identity and topology
#[derive(Clone)]
pub struct LedgerConfig {
    /// Identity name, `admin` when unset
    pub identity_name: String,
    /// Base64-encoded PEM private key
    pub private_key: Option<String>,
    /// Base64-encoded PEM certificate
    pub cert: Option<String>,
    /// Path to the JSON connection profile
    pub connection_profile_path: Option<String>,
    /// Gateway request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("identity_name", &self.identity_name)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("cert", &self.cert.as_ref().map(|_| "<set>"))
            .field("connection_profile_path", &self.connection_profile_path)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Configuration for the indexer run
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Manual override of the first block
    pub start_block: Option<u64>,
    /// Manual override of the last block
    pub end_block: Option<u64>,
    /// Block feed poll interval in milliseconds
    pub poll_interval_ms: u64,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Checkpoint store configuration
    pub database: DatabaseConfig,
    /// Ledger configuration
    pub ledger: LedgerConfig,
    /// Indexer configuration
    pub indexer: IndexerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Ensure .env file is loaded
        dotenv().ok();

        let database_config = DatabaseConfig {
            url: non_empty_var("DATABASE_URL"),
            ca_certificate: non_empty_var("DATABASE_CA_CERT"),
        };

        let ledger_config = LedgerConfig {
            identity_name: env::var("LEDGER_IDENTITY_NAME").unwrap_or_default(),
            private_key: non_empty_var("LEDGER_PRIVATE_KEY"),
            cert: non_empty_var("LEDGER_CERT"),
            connection_profile_path: non_empty_var("CONNECTION_PROFILE"),
            request_timeout_ms: parse_var("LEDGER_REQUEST_TIMEOUT_MS").unwrap_or(30000),
        };

        let indexer_config = IndexerConfig {
            start_block: parse_var("START_BLOCK"),
            end_block: parse_var("END_BLOCK"),
            poll_interval_ms: parse_var("FEED_POLL_INTERVAL_MS").unwrap_or(1000),
        };

        Self {
            database: database_config,
            ledger: ledger_config,
            indexer: indexer_config,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.indexer.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger.request_timeout_ms)
    }

    /// Build the processing request. Values that are missing or unreadable
    /// stay `None` so request validation reports them.
    pub fn processing_request(&self) -> ProcessingRequest {
        let store_endpoint = self.database.url.as_ref().map(|url| StoreEndpoint {
            url: url.clone(),
            ca_certificate: self.database.ca_certificate.clone(),
        });

        let credentials = match (&self.ledger.private_key, &self.ledger.cert) {
            (Some(private_key), Some(cert)) => Some(Credentials::new(
                self.ledger.identity_name.clone(),
                private_key.clone(),
                cert.clone(),
            )),
            _ => None,
        };

        let connection_profile = self
            .ledger
            .connection_profile_path
            .as_deref()
            .and_then(load_connection_profile);

        ProcessingRequest {
            store_endpoint,
            credentials,
            connection_profile,
            start_block: self.indexer.start_block,
            end_block: self.indexer.end_block,
        }
    }
}

fn load_connection_profile(path: &str) -> Option<ConnectionProfile> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            logging::log_error(&format!("Cannot read connection profile {}: {}", path, e));
            return None;
        }
    };

    match ConnectionProfile::from_json(&contents) {
        Ok(profile) => Some(profile),
        Err(e) => {
            logging::log_error(&format!("Invalid connection profile {}: {}", path, e));
            None
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_var(name: &str) -> Option<u64> {
    let value = non_empty_var(name)?;
    match value.trim().parse::<u64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            logging::log_warning(&format!("Ignoring {}={}: not a non-negative integer", name, value));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: Some("postgres://localhost/ledger".to_string()),
                ca_certificate: None,
            },
            ledger: LedgerConfig {
                identity_name: String::new(),
                private_key: Some("a2V5".to_string()),
                cert: Some("Y2VydA==".to_string()),
                connection_profile_path: None,
                request_timeout_ms: 30000,
            },
            indexer: IndexerConfig {
                start_block: Some(0),
                end_block: None,
                poll_interval_ms: 1000,
            },
        }
    }

    #[test]
    fn missing_profile_is_left_for_validation() {
        let request = config().processing_request();
        assert!(request.store_endpoint.is_some());
        assert!(request.credentials.is_some());
        assert!(request.connection_profile.is_none());
        assert_eq!(request.start_block, Some(0));
        assert!(request.validate().is_err());
    }

    #[test]
    fn credentials_need_both_key_and_cert() {
        let mut config = config();
        config.ledger.cert = None;
        assert!(config.processing_request().credentials.is_none());
    }

    #[test]
    fn loads_connection_profile_from_file() {
        let path = env::temp_dir().join(format!("ledger-indexer-profile-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "name": "mychannel", "peers": {{ "peer0.org1": {{ "url": "grpcs://peer0:7051" }} }} }}"#
        )
        .unwrap();

        let mut config = config();
        config.ledger.connection_profile_path = Some(path.to_string_lossy().into_owned());
        let validated = config.processing_request().validate().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(validated.stream_name(), "mychannel");
        assert_eq!(validated.peer, "peer0.org1");
    }
}
