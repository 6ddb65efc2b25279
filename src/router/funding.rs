//! Funding HTTP API.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::AppState;
use crate::error::Result;
use crate::funding::FundingRecord;
use crate::middleware::AuthUser;
use crate::router::Valid;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create).get(list))
}

fn validate_amount(amount: &Decimal) -> std::result::Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount").with_message("Amount must be positive.".into()));
    }
    Ok(())
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct Body {
    #[validate(custom(function = "crate::router::funding::validate_amount"))]
    pub amount: Decimal,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub inserted_id: Uuid,
}

/// Record a contribution under the caller's verified email.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Valid(body): Valid<Body>,
) -> Result<Json<Created>> {
    let inserted_id = state
        .funding()
        .insert(&auth.email, body.amount, body.date)
        .await?;

    Ok(Json(Created { inserted_id }))
}

/// Every contribution, newest first.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<FundingRecord>>> {
    Ok(Json(state.funding().list().await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/funding.sql"))]
    async fn test_record_and_list_funding(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let token = state.token.create("donor@donora.test").unwrap();

        let response = make_request(
            Some(token.clone()),
            app.clone(),
            Method::POST,
            "/funding",
            json!({ "amount": 500, "date": "2026-07-20T00:00:00Z" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            make_request(Some(token), app, Method::GET, "/funding", String::default()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let records: Vec<FundingRecord> = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(records.len(), 3);
        // Newest first; the record just inserted carries the claims email.
        assert_eq!(records[0].amount, Decimal::from(500));
        assert_eq!(records[0].email, "donor@donora.test");
        assert!(records[0].date >= records[1].date);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_non_positive_amount_is_rejected(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let token = state.token.create("donor@donora.test").unwrap();

        let response = make_request(
            Some(token),
            app,
            Method::POST,
            "/funding",
            json!({ "amount": -5 }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test]
    async fn test_funding_requires_token(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(None, app, Method::GET, "/funding", String::default()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
