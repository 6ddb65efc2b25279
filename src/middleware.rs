//! Authorization gate for routes.
//!
//! Two composable checks: [`AuthUser`] proves the request carries a valid
//! bearer token, the `require_*` helpers prove the identity behind it holds
//! an allowed role. Role checks read the user's current record, so a
//! demotion takes effect on the next request even for a live token.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::Result;
use crate::user::{Role, User, UserStatus};
use crate::{AppState, ServerError};

const BEARER: &str = "Bearer ";

/// Identity claims recovered from the `Authorization` header.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(ServerError::Unauthorized)?;
        let token = header.strip_prefix(BEARER).unwrap_or(header);

        let claims = state.token.decode(token)?;
        Ok(AuthUser { email: claims.sub })
    }
}

impl AuthUser {
    /// Ownership check: the path or query email must match the token's.
    pub fn ensure_self(&self, email: &str) -> Result<()> {
        if self.email != email {
            return Err(ServerError::Forbidden);
        }
        Ok(())
    }
}

/// Load the caller's record; a token whose user vanished is forbidden.
async fn current_user(state: &AppState, auth: &AuthUser) -> Result<User> {
    state
        .users()
        .find_by_email(&auth.email)
        .await?
        .ok_or(ServerError::Forbidden)
}

/// Caller must hold the admin role.
pub async fn require_admin(state: &AppState, auth: &AuthUser) -> Result<User> {
    let user = current_user(state, auth).await?;
    if user.role != Role::Admin {
        return Err(ServerError::Forbidden);
    }
    Ok(user)
}

/// Caller must hold the admin or volunteer role.
pub async fn require_staff(state: &AppState, auth: &AuthUser) -> Result<User> {
    let user = current_user(state, auth).await?;
    if !matches!(user.role, Role::Admin | Role::Volunteer) {
        return Err(ServerError::Forbidden);
    }
    Ok(user)
}

/// Caller must not be blocked.
pub async fn require_active(state: &AppState, auth: &AuthUser) -> Result<User> {
    let user = current_user(state, auth).await?;
    if user.status == UserStatus::Blocked {
        return Err(ServerError::Forbidden);
    }
    Ok(user)
}
