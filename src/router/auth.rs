//! Issue bearer tokens from submitted identity claims.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct Body {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub token: String,
}

/// Sign the submitted email into a 3-hour bearer token.
pub async fn issue(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let token = state.token.create(&body.email)?;
    Ok(Json(Response { token }))
}
