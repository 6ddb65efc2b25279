//! HTTP routes.
pub mod auth;
pub mod blogs;
pub mod donations;
pub mod funding;
pub mod payment;
pub mod search;
pub mod stats;
pub mod status;
pub mod users;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ServerError;

/// JSON body extractor running the [`Validate`] rules before the handler.
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Valid(value))
    }
}

/// Reported outcome of an update, zero matched rows included.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    pub updated: u64,
}

/// Reported outcome of a delete, zero deleted rows included.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Removal {
    pub deleted: u64,
}

#[cfg(test)]
pub(crate) fn state(pool: sqlx::PgPool) -> crate::AppState {
    use std::sync::Arc;

    use metrics_exporter_prometheus::PrometheusBuilder;

    use crate::{config, database, payment, token};

    let config = config::Config {
        port: 0,
        database_url: String::default(),
        pool_size: 1,
        token_secret: "test-secret".into(),
        issuer: "donora".into(),
        payment: config::Payment {
            secret_key: "sk_test".into(),
            // Unroutable on purpose: a test reaching the processor must fail.
            api_base: "http://127.0.0.1:9".into(),
            currency: "bdt".into(),
        },
    };

    crate::AppState {
        token: token::TokenManager::new(&config.token_secret, &config.issuer),
        payment: payment::PaymentClient::new(&config.payment),
        config: Arc::new(config),
        db: database::Database { postgres: pool },
        prometheus: PrometheusBuilder::new().build_recorder().handle(),
    }
}
