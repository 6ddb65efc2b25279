mod repository;

pub use repository::*;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a donation request.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Inprogress,
    Done,
    Canceled,
}

/// Donation request as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub id: Uuid,
    pub requester_name: String,
    pub requester_email: String,
    pub recipient_name: String,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub blood_group: String,
    pub donation_date: NaiveDate,
    pub donation_time: Option<String>,
    pub request_message: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when a request is created.
///
/// The requester email never comes from here: it is taken from the verified
/// token claims, so a request cannot be filed under someone else's name.
#[derive(Clone, Debug, Default)]
pub struct NewDonationRequest {
    pub requester_name: String,
    pub recipient_name: String,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub blood_group: String,
    pub donation_date: NaiveDate,
    pub donation_time: Option<String>,
    pub request_message: Option<String>,
}

/// Partial update of a request. `None` leaves the column untouched.
#[derive(Clone, Debug, Default)]
pub struct RequestChanges {
    pub recipient_name: Option<String>,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub blood_group: Option<String>,
    pub donation_date: Option<NaiveDate>,
    pub donation_time: Option<String>,
    pub request_message: Option<String>,
    pub status: Option<RequestStatus>,
}
