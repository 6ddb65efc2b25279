//! Configuration manager for donora.
//!
//! Everything comes from environment variables so the same image can move
//! between deployments without a configuration file.

use std::env;

use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ISSUER: &str = "donora";
const DEFAULT_CURRENCY: &str = "bdt";
const DEFAULT_PAYMENT_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing `{0}` environment variable")]
    Missing(&'static str),

    #[error("`{0}` must be a number")]
    NotANumber(&'static str),
}

/// Process-wide configuration, read once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Port the HTTP server listens on.
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Maximum pool connections.
    pub pool_size: u32,
    /// Shared secret signing bearer tokens.
    pub token_secret: String,
    /// `iss` claim on issued tokens.
    pub issuer: String,
    /// Payment processor settings.
    pub payment: Payment,
}

/// Payment processor configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Payment {
    /// Secret API key for the processor.
    pub secret_key: String,
    /// Base URL of the processor REST API.
    pub api_base: String,
    /// ISO currency code used for every intent.
    pub currency: String,
}

impl Config {
    /// Read and validate the whole configuration from the environment.
    ///
    /// A missing database URL, signing secret or payment key is fatal here,
    /// on purpose: better than surfacing as a 500 on the first request.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(port) => port.parse().map_err(|_| ConfigError::NotANumber("PORT"))?,
            Err(_) => DEFAULT_PORT,
        };
        let pool_size = match env::var("PG_POOL_SIZE") {
            Ok(size) => size
                .parse()
                .map_err(|_| ConfigError::NotANumber("PG_POOL_SIZE"))?,
            Err(_) => crate::database::DEFAULT_POOL_SIZE,
        };

        Ok(Self {
            port,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            pool_size,
            token_secret: env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?,
            issuer: env::var("SERVER_NAME").unwrap_or_else(|_| DEFAULT_ISSUER.into()),
            payment: Payment {
                secret_key: env::var("STRIPE_SECRET_KEY")
                    .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?,
                api_base: env::var("PAYMENT_API_BASE")
                    .unwrap_or_else(|_| DEFAULT_PAYMENT_API_BASE.into()),
                currency: env::var("PAYMENT_CURRENCY")
                    .unwrap_or_else(|_| DEFAULT_CURRENCY.into()),
            },
        })
    }
}
