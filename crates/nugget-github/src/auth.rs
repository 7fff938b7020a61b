//! GitHub App authentication
//!
//! Apps authenticate in two steps: a short-lived RS256 JWT signed with the
//! app's private key identifies the app itself, and is then exchanged for an
//! installation token scoped to the repositories of one installation.

use crate::error::Result;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::fmt;

/// Backdate `iat` to tolerate clock drift between us and GitHub
const CLOCK_DRIFT_SECS: i64 = 60;
/// GitHub rejects app JWTs valid for longer than ten minutes
const JWT_LIFETIME_SECS: i64 = 9 * 60;

#[derive(Debug, Serialize)]
struct Claims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// App ID and private key of a GitHub App
#[derive(Clone)]
pub struct AppCredentials {
    app_id: u64,
    key: EncodingKey,
}

impl AppCredentials {
    /// Load credentials from a PEM encoded RSA private key
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid RSA PEM.
    pub fn from_pem(app_id: u64, pem: &[u8]) -> Result<Self> {
        Ok(Self {
            app_id,
            key: EncodingKey::from_rsa_pem(pem)?,
        })
    }

    /// The app ID
    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    /// Mint a JWT identifying the app
    pub fn jwt(&self) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iat: now - CLOCK_DRIFT_SECS,
            exp: now + JWT_LIFETIME_SECS,
            iss: self.app_id.to_string(),
        };
        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.key)?)
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;

    const TEST_KEY: &[u8] = include_bytes!("../tests/fixtures/test-app-key.pem");

    #[test]
    fn test_jwt_claims() {
        let credentials = AppCredentials::from_pem(12345, TEST_KEY).unwrap();
        let jwt = credentials.jwt().unwrap();

        let parts: Vec<&str> = jwt.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "RS256");

        let claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims["iss"], "12345");
        let lifetime = claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap();
        assert!(lifetime <= 600, "lifetime {lifetime}s exceeds GitHub's limit");
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(AppCredentials::from_pem(1, b"not a key").is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let credentials = AppCredentials::from_pem(7, TEST_KEY).unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("app_id: 7"));
        assert!(!debug.contains("PRIVATE"));
    }
}
