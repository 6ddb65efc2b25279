//! Users-related HTTP API.

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::middleware::{self, AuthUser};
use crate::router::{Mutation, Valid};
use crate::user::{NewUser, ProfileChanges, Role, User, UserStatus};
use crate::{AppState, ServerError};

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST /users` creates a record unless the email exists.
        // `GET /users` lists everyone, admin only.
        .route("/", post(create).get(list))
        .route("/role/{email}", get(role))
        .route("/status/{id}", patch(set_status))
        .route("/admin/{id}", patch(make_admin))
        .route("/volunteer/{id}", patch(make_volunteer))
        .route("/{key}", get(get_one).patch(update_profile))
}

#[derive(Debug, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters long."))]
    pub name: String,
    pub avatar: Option<String>,
    pub blood_group: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub inserted_id: Option<Uuid>,
}

/// Create-if-absent: the second submission of an email reports no new id.
///
/// No token required, this is the first-sign-in hook. Every record starts
/// as an active donor regardless of what the caller sends.
pub async fn create(
    State(state): State<AppState>,
    Valid(body): Valid<CreateBody>,
) -> Result<Json<Created>> {
    let user = NewUser {
        email: body.email,
        name: body.name,
        avatar: body.avatar,
        blood_group: body.blood_group,
        division: body.division,
        district: body.district,
        upazila: body.upazila,
    };

    let inserted_id = state.users().insert_if_absent(&user).await?;
    Ok(Json(Created { inserted_id }))
}

/// List every user. Admin only.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<User>>> {
    middleware::require_admin(&state, &auth).await?;

    Ok(Json(state.users().list().await?))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: Role,
}

/// Current role of the caller's own record, defaulting to donor.
pub async fn role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<RoleResponse>> {
    auth.ensure_self(&email)?;

    let role = state
        .users()
        .find_by_email(&email)
        .await?
        .map(|user| user.role)
        .unwrap_or_default();

    Ok(Json(RoleResponse { role }))
}

/// Fetch the caller's own record by email.
pub async fn get_one(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(email): Path<String>,
) -> Result<Json<User>> {
    auth.ensure_self(&email)?;

    let user = state
        .users()
        .find_by_email(&email)
        .await?
        .ok_or(ServerError::NotFound)?;

    Ok(Json(user))
}

#[derive(Debug, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters long."))]
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub blood_group: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// Self-service profile update.
///
/// `role` and `status` are not part of [`UpdateBody`], so they are dropped
/// during deserialization and can never reach the store from this route.
pub async fn update_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Valid(body): Valid<UpdateBody>,
) -> Result<Json<Mutation>> {
    let changes = ProfileChanges {
        name: body.name,
        avatar: body.avatar,
        blood_group: body.blood_group,
        division: body.division,
        district: body.district,
        upazila: body.upazila,
    };

    let updated = state.users().update_profile(id, &changes).await?;
    Ok(Json(Mutation { updated }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: UserStatus,
}

/// Set the active/blocked status of any user. Admin only.
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Mutation>> {
    middleware::require_admin(&state, &auth).await?;

    let updated = state.users().set_status(id, body.status).await?;
    Ok(Json(Mutation { updated }))
}

/// Promote a user to admin. Admin only.
pub async fn make_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Mutation>> {
    middleware::require_admin(&state, &auth).await?;

    let updated = state.users().set_role(id, Role::Admin).await?;
    Ok(Json(Mutation { updated }))
}

/// Promote a user to volunteer. Admin only.
pub async fn make_volunteer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Mutation>> {
    middleware::require_admin(&state, &auth).await?;

    let updated = state.users().set_role(id, Role::Volunteer).await?;
    Ok(Json(Mutation { updated }))
}
