//! Donation-requests HTTP API.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::donation::{DonationRequest, NewDonationRequest, RequestChanges, RequestStatus};
use crate::error::Result;
use crate::middleware::{self, AuthUser};
use crate::router::{Mutation, Removal, Valid};
use crate::{AppState, ServerError};

pub fn router() -> Router<AppState> {
    Router::new()
        // `POST` creates a request; `GET` is the public listing.
        .route("/", post(create).get(list))
        .route("/pending", get(pending))
        .route("/all", get(all))
        .route("/{id}", get(get_one).patch(update).delete(remove))
}

#[derive(Debug, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters long."))]
    pub requester_name: String,
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters long."))]
    pub recipient_name: String,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    #[validate(length(min = 1, max = 8, message = "Blood group must be 1 to 8 characters long."))]
    pub blood_group: String,
    pub donation_date: NaiveDate,
    pub donation_time: Option<String>,
    pub request_message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub inserted_id: Uuid,
}

/// File a new donation request.
///
/// Blocked users are denied whatever else they send; the requester email
/// is always the one proven by the token.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Valid(body): Valid<CreateBody>,
) -> Result<Json<Created>> {
    middleware::require_active(&state, &auth).await?;

    let request = NewDonationRequest {
        requester_name: body.requester_name,
        recipient_name: body.recipient_name,
        recipient_district: body.recipient_district,
        recipient_upazila: body.recipient_upazila,
        hospital_name: body.hospital_name,
        full_address: body.full_address,
        blood_group: body.blood_group,
        donation_date: body.donation_date,
        donation_time: body.donation_time,
        request_message: body.request_message,
    };

    let inserted_id = state.requests().insert(&auth.email, &request).await?;
    Ok(Json(Created { inserted_id }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub email: Option<String>,
}

/// Public listing.
///
/// With `?email=` this is a requester's dashboard; without it the pending
/// board. Kept for compatibility with existing front-ends, `/pending` is
/// the explicit spelling of the second half.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DonationRequest>>> {
    let requests = match query.email {
        Some(email) => state.requests().list_by_requester(&email).await?,
        None => state.requests().list_pending().await?,
    };

    Ok(Json(requests))
}

/// Pending requests only, soonest donation first.
pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<DonationRequest>>> {
    Ok(Json(state.requests().list_pending().await?))
}

/// Every request regardless of status. Admin and volunteers only.
pub async fn all(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<DonationRequest>>> {
    middleware::require_staff(&state, &auth).await?;

    Ok(Json(state.requests().list_all().await?))
}

/// Fetch one request, public detail page.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DonationRequest>> {
    let request = state
        .requests()
        .find(id)
        .await?
        .ok_or(ServerError::NotFound)?;

    Ok(Json(request))
}

#[derive(Debug, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters long."))]
    pub recipient_name: Option<String>,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    #[validate(length(min = 1, max = 8, message = "Blood group must be 1 to 8 characters long."))]
    pub blood_group: Option<String>,
    pub donation_date: Option<NaiveDate>,
    pub donation_time: Option<String>,
    pub request_message: Option<String>,
    pub status: Option<RequestStatus>,
}

/// Partial update, status changes included. Token required.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Valid(body): Valid<UpdateBody>,
) -> Result<Json<Mutation>> {
    let changes = RequestChanges {
        recipient_name: body.recipient_name,
        recipient_district: body.recipient_district,
        recipient_upazila: body.recipient_upazila,
        hospital_name: body.hospital_name,
        full_address: body.full_address,
        blood_group: body.blood_group,
        donation_date: body.donation_date,
        donation_time: body.donation_time,
        request_message: body.request_message,
        status: body.status,
    };

    let updated = state.requests().update(id, &changes).await?;
    Ok(Json(Mutation { updated }))
}

/// Delete a request. Token required.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Removal>> {
    let deleted = state.requests().delete(id).await?;
    Ok(Json(Removal { deleted }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    fn create_body() -> String {
        json!({
            "requesterName": "Tanvir Hasan",
            "recipientName": "Rahim Uddin",
            "recipientDistrict": "Dhaka",
            "hospitalName": "Enam Medical",
            "bloodGroup": "O-",
            "donationDate": "2026-10-01",
            "donationTime": "10:30"
        })
        .to_string()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_blocked_user_cannot_create(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let token = state.token.create("blocked@donora.test").unwrap();

        let response = make_request(
            Some(token),
            app,
            Method::POST,
            "/donation-requests",
            create_body(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_create_and_list_by_requester(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let token = state.token.create("donor@donora.test").unwrap();

        let response = make_request(
            Some(token),
            app.clone(),
            Method::POST,
            "/donation-requests",
            create_body(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let created: Created = serde_json::from_slice(&bytes).unwrap();

        let response = make_request(
            None,
            app,
            Method::GET,
            "/donation-requests?email=donor@donora.test",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let requests: Vec<DonationRequest> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, created.inserted_id);
        // The identity comes from the token, not the body.
        assert_eq!(requests[0].requester_email, "donor@donora.test");
        assert_eq!(requests[0].status, RequestStatus::Pending);
    }

    #[sqlx::test(fixtures("../../fixtures/requests.sql"))]
    async fn test_public_listing_defaults_to_pending_sorted(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            None,
            app,
            Method::GET,
            "/donation-requests",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let requests: Vec<DonationRequest> = serde_json::from_slice(&bytes).unwrap();

        // The `done` fixture row never shows up, and dates ascend.
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.status == RequestStatus::Pending));
        assert!(requests[0].donation_date < requests[1].donation_date);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/requests.sql"))]
    async fn test_full_listing_is_staff_only(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let token = state.token.create("donor@donora.test").unwrap();
        let response = make_request(
            Some(token),
            app.clone(),
            Method::GET,
            "/donation-requests/all",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let token = state.token.create("volunteer@donora.test").unwrap();
        let response = make_request(
            Some(token),
            app,
            Method::GET,
            "/donation-requests/all",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let requests: Vec<DonationRequest> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(requests.len(), 3);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/requests.sql"))]
    async fn test_update_and_delete_require_token(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let id = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaa1";

        let response = make_request(
            None,
            app.clone(),
            Method::PATCH,
            &format!("/donation-requests/{id}"),
            json!({ "status": "done" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = state.token.create("volunteer@donora.test").unwrap();
        let response = make_request(
            Some(token.clone()),
            app.clone(),
            Method::PATCH,
            &format!("/donation-requests/{id}"),
            json!({ "status": "done" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let mutation: router::Mutation = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(mutation.updated, 1);

        let response = make_request(
            Some(token),
            app,
            Method::DELETE,
            &format!("/donation-requests/{id}"),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let removal: router::Removal = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(removal.deleted, 1);
    }

    #[sqlx::test]
    async fn test_missing_request_is_not_found(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            None,
            app,
            Method::GET,
            &format!("/donation-requests/{}", Uuid::new_v4()),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
