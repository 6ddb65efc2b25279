//! Blogs HTTP API.

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::blog::{Blog, BlogContent, BlogStatus};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::router::{Mutation, Removal, Valid};
use crate::{AppState, ServerError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/published", get(published))
        .route("/{id}", get(get_one).put(replace).delete(remove))
        .route("/{id}/status", patch(set_status))
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct CreateBody {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters long."))]
    pub title: String,
    pub thumbnail: Option<String>,
    #[validate(length(min = 1, message = "Content must not be empty."))]
    pub content: String,
    pub status: Option<BlogStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Created {
    pub inserted_id: Uuid,
}

/// Create a post; the date is server-assigned and status defaults to draft.
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Valid(body): Valid<CreateBody>,
) -> Result<Json<Created>> {
    let blog = BlogContent {
        title: body.title,
        thumbnail: body.thumbnail,
        content: body.content,
        status: body.status.unwrap_or_default(),
    };

    let inserted_id = state.blogs().insert(&blog).await?;
    Ok(Json(Created { inserted_id }))
}

/// Every post, drafts included. Token required.
pub async fn list(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Vec<Blog>>> {
    Ok(Json(state.blogs().list_all().await?))
}

/// Published posts only, public.
pub async fn published(State(state): State<AppState>) -> Result<Json<Vec<Blog>>> {
    Ok(Json(state.blogs().list_published().await?))
}

/// Fetch one post by id, public, no status filter.
pub async fn get_one(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Blog>> {
    let blog = state.blogs().find(id).await?.ok_or(ServerError::NotFound)?;

    Ok(Json(blog))
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct ReplaceBody {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters long."))]
    pub title: String,
    pub thumbnail: Option<String>,
    #[validate(length(min = 1, message = "Content must not be empty."))]
    pub content: String,
    pub status: BlogStatus,
}

/// Replace title, thumbnail, content and status.
pub async fn replace(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Valid(body): Valid<ReplaceBody>,
) -> Result<Json<Mutation>> {
    let blog = BlogContent {
        title: body.title,
        thumbnail: body.thumbnail,
        content: body.content,
        status: body.status,
    };

    let updated = state.blogs().replace(id, &blog).await?;
    Ok(Json(Mutation { updated }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
    pub status: BlogStatus,
}

/// Flip the draft/published switch.
pub async fn set_status(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Mutation>> {
    let updated = state.blogs().set_status(id, body.status).await?;
    Ok(Json(Mutation { updated }))
}

/// Delete a post.
pub async fn remove(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Removal>> {
    let deleted = state.blogs().delete(id).await?;
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

    #[sqlx::test(fixtures("../../fixtures/blogs.sql"))]
    async fn test_published_listing_excludes_drafts(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(
            None,
            app,
            Method::GET,
            "/blogs/published",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let blogs: Vec<Blog> = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].title, "Why donate blood");
        assert_eq!(blogs[0].status, BlogStatus::Published);
    }

    #[sqlx::test(fixtures("../../fixtures/blogs.sql"))]
    async fn test_public_read_by_id(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        // Drafts are reachable by id, that read has no status filter.
        let response = make_request(
            None,
            app.clone(),
            Method::GET,
            "/blogs/bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbb2",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(
            None,
            app,
            Method::GET,
            &format!("/blogs/{}", Uuid::new_v4()),
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql"))]
    async fn test_create_then_publish(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());
        let token = state.token.create("volunteer@donora.test").unwrap();

        let response = make_request(
            Some(token.clone()),
            app.clone(),
            Method::POST,
            "/blogs",
            json!({ "title": "Camp recap", "content": "We collected 40 bags." }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let created: Created = serde_json::from_slice(&bytes).unwrap();

        // Fresh posts are drafts, invisible on the public listing.
        let response = make_request(
            None,
            app.clone(),
            Method::GET,
            "/blogs/published",
            String::default(),
        )
        .await;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let blogs: Vec<Blog> = serde_json::from_slice(&bytes).unwrap();
        assert!(blogs.is_empty());

        let response = make_request(
            Some(token),
            app.clone(),
            Method::PATCH,
            &format!("/blogs/{}/status", created.inserted_id),
            json!({ "status": "published" }).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(
            None,
            app,
            Method::GET,
            "/blogs/published",
            String::default(),
        )
        .await;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let blogs: Vec<Blog> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].id, created.inserted_id);
    }

    #[sqlx::test(fixtures("../../fixtures/blogs.sql"))]
    async fn test_full_listing_requires_token(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state);

        let response = make_request(None, app, Method::GET, "/blogs", String::default()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
