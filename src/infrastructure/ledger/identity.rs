//! X.509 identity built from base64-encoded credentials

use base64::{engine::general_purpose, Engine as _};

use crate::domain::models::Credentials;
use crate::infrastructure::ledger::LedgerError;

/// Decoded signing identity used to authenticate against the gateway
#[derive(Clone)]
pub struct Identity {
    pub name: String,
    pub msp_id: String,
    pub certificate_pem: String,
    pub private_key_pem: String,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("name", &self.name)
            .field("msp_id", &self.msp_id)
            .finish_non_exhaustive()
    }
}

impl Identity {
    /// Decode the credentials' certificate and key
    pub fn from_credentials(credentials: &Credentials, msp_id: &str) -> Result<Self, LedgerError> {
        Ok(Self {
            name: credentials.identity_name().to_string(),
            msp_id: msp_id.to_string(),
            certificate_pem: decode_pem("certificate", &credentials.cert)?,
            private_key_pem: decode_pem("private key", &credentials.private_key)?,
        })
    }

    /// Client TLS identity for the HTTP transport
    pub fn to_tls_identity(&self) -> Result<reqwest::Identity, LedgerError> {
        reqwest::Identity::from_pkcs8_pem(
            self.certificate_pem.as_bytes(),
            self.private_key_pem.as_bytes(),
        )
        .map_err(|e| LedgerError::IdentityError(format!("Invalid identity for {}: {}", self.name, e)))
    }
}

fn decode_pem(what: &str, encoded: &str) -> Result<String, LedgerError> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| LedgerError::IdentityError(format!("{} is not valid base64: {}", what, e)))?;

    String::from_utf8(bytes)
        .map_err(|e| LedgerError::IdentityError(format!("{} is not valid UTF-8: {}", what, e)))
}
