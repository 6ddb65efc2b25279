//! Handle database requests for the donation-requests collection.

use sqlx::PgPool;
use uuid::Uuid;

use crate::donation::{DonationRequest, NewDonationRequest, RequestChanges};
use crate::error::Result;

const REQUEST_COLUMNS: &str = "id, requester_name, requester_email, recipient_name, \
     recipient_district, recipient_upazila, hospital_name, full_address, blood_group, \
     donation_date, donation_time, request_message, status, created_at";

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    /// Create a new [`RequestRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a request for `requester_email`, status defaults to pending.
    pub async fn insert(
        &self,
        requester_email: &str,
        request: &NewDonationRequest,
    ) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO donation_requests
                (requester_name, requester_email, recipient_name, recipient_district,
                 recipient_upazila, hospital_name, full_address, blood_group,
                 donation_date, donation_time, request_message)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING id"#,
        )
        .bind(&request.requester_name)
        .bind(requester_email)
        .bind(&request.recipient_name)
        .bind(&request.recipient_district)
        .bind(&request.recipient_upazila)
        .bind(&request.hospital_name)
        .bind(&request.full_address)
        .bind(&request.blood_group)
        .bind(request.donation_date)
        .bind(&request.donation_time)
        .bind(&request.request_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Find a request by id.
    pub async fn find(&self, id: Uuid) -> Result<Option<DonationRequest>> {
        let request = sqlx::query_as::<_, DonationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM donation_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    /// All requests filed by one requester, soonest donation first.
    pub async fn list_by_requester(&self, email: &str) -> Result<Vec<DonationRequest>> {
        let requests = sqlx::query_as::<_, DonationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM donation_requests \
             WHERE requester_email = $1 ORDER BY donation_date ASC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Public listing: pending requests only, soonest donation first.
    pub async fn list_pending(&self) -> Result<Vec<DonationRequest>> {
        let requests = sqlx::query_as::<_, DonationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM donation_requests \
             WHERE status = 'pending' ORDER BY donation_date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Every request regardless of status, latest donation first.
    pub async fn list_all(&self) -> Result<Vec<DonationRequest>> {
        let requests = sqlx::query_as::<_, DonationRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM donation_requests ORDER BY donation_date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Apply partial changes to a request.
    pub async fn update(&self, id: Uuid, changes: &RequestChanges) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE donation_requests SET
                recipient_name = COALESCE($2, recipient_name),
                recipient_district = COALESCE($3, recipient_district),
                recipient_upazila = COALESCE($4, recipient_upazila),
                hospital_name = COALESCE($5, hospital_name),
                full_address = COALESCE($6, full_address),
                blood_group = COALESCE($7, blood_group),
                donation_date = COALESCE($8, donation_date),
                donation_time = COALESCE($9, donation_time),
                request_message = COALESCE($10, request_message),
                status = COALESCE($11, status)
                WHERE id = $1"#,
        )
        .bind(id)
        .bind(&changes.recipient_name)
        .bind(&changes.recipient_district)
        .bind(&changes.recipient_upazila)
        .bind(&changes.hospital_name)
        .bind(&changes.full_address)
        .bind(&changes.blood_group)
        .bind(changes.donation_date)
        .bind(&changes.donation_time)
        .bind(&changes.request_message)
        .bind(changes.status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete a request by id.
    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM donation_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Total number of requests.
    pub async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donation_requests")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
