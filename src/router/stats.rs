//! Aggregate counts for the admin dashboard.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_users: i64,
    pub total_requests: i64,
    pub total_funding: Decimal,
}

/// Counts plus the exact funding sum at call time.
///
/// Three independent reads, no snapshot across them.
pub async fn summary(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Summary>> {
    let total_users = state.users().count().await?;
    let total_requests = state.requests().count().await?;
    let total_funding = state.funding().total().await?;

    Ok(Json(Summary {
        total_users,
        total_requests,
        total_funding,
    }))
}
