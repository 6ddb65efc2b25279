mod repository;

pub use repository::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Publication state of a blog post.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "blog_status", rename_all = "lowercase")]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
}

/// Blog post as saved on database. `date` is server-assigned at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: Option<String>,
    pub content: String,
    pub status: BlogStatus,
    pub date: DateTime<Utc>,
}

/// Full replacement payload for a blog post.
#[derive(Clone, Debug, Default)]
pub struct BlogContent {
    pub title: String,
    pub thumbnail: Option<String>,
    pub content: String,
    pub status: BlogStatus,
}
