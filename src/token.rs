//! Manage json web tokens.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, get_current_timestamp,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

/// Tokens are valid for 3 hours; callers re-authenticate after that.
pub const EXPIRATION_SECS: u64 = 60 * 60 * 3;

/// Pieces of information asserted on a JWT.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Identifies the expiration time on or after which the JWT must not be
    /// accepted for processing.
    pub exp: u64,
    /// Identifies the time at which the JWT was issued.
    pub iat: u64,
    /// Identifies the organization that issued the JWT.
    pub iss: String,
    /// User email.
    pub sub: String,
}

/// Manage JWT tokens.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("TokenManager")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance over a shared secret.
    pub fn new(secret: &str, issuer: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_owned(),
        }
    }

    /// Create a new [`jsonwebtoken`] asserting `email`.
    pub fn create(&self, email: &str) -> Result<String> {
        self.issue(email, get_current_timestamp() + EXPIRATION_SECS)
    }

    fn issue(&self, email: &str, exp: u64) -> Result<String> {
        let header = Header::new(self.algorithm);
        let claims = Claims {
            exp,
            iat: get_current_timestamp(),
            iss: self.issuer.clone(),
            sub: email.to_owned(),
        };

        encode(&header, &claims, &self.encoding_key).map_err(|err| ServerError::Internal {
            details: err.to_string(),
        })
    }

    /// Decode and check a token.
    ///
    /// Missing, malformed, forged and expired tokens all collapse into
    /// [`ServerError::Unauthorized`].
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| ServerError::Unauthorized)
    }
}
