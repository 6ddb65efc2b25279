//! Public donor discovery.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::AppState;
use crate::error::Result;
use crate::user::{DonorFilters, DonorProfile};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub blood_group: Option<String>,
    pub division: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// Search active donors; anonymous callers welcome.
///
/// Only the contact-free [`DonorProfile`] projection ever leaves here.
pub async fn donors(
    State(state): State<AppState>,
    Query(filters): Query<Filters>,
) -> Result<Json<Vec<DonorProfile>>> {
    let filters = DonorFilters {
        blood_group: filters.blood_group,
        division: filters.division,
        district: filters.district,
        upazila: filters.upazila,
    };

    Ok(Json(state.users().search_donors(&filters).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use sqlx::{Pool, Postgres};

    use super::*;
    use crate::*;

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_search_returns_active_donors_only(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            None,
            app.clone(),
            Method::GET,
            "/search-donors",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let donors: Vec<DonorProfile> = serde_json::from_slice(&bytes).unwrap();

        // Admin, volunteer and the blocked donor are all filtered out.
        assert_eq!(donors.len(), 1);
        assert_eq!(donors[0].name, "Tanvir Hasan");

        // The blocked donor's blood group finds nobody.
        let response = make_request(
            None,
            app,
            Method::GET,
            "/search-donors?bloodGroup=AB%2B",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let donors: Vec<DonorProfile> = serde_json::from_slice(&bytes).unwrap();
        assert!(donors.is_empty());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_projection_excludes_contact_fields(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            None,
            app,
            Method::GET,
            "/search-donors?division=Khulna",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let donors: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let donors = donors.as_array().unwrap();
        assert!(!donors.is_empty());
        for donor in donors {
            let fields = donor.as_object().unwrap();
            assert!(!fields.contains_key("email"));
            assert!(!fields.contains_key("id"));
            assert!(!fields.contains_key("role"));
            assert!(!fields.contains_key("status"));
        }
    }
}
