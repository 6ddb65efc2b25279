//! Handle database requests for the blogs collection.

use sqlx::PgPool;
use uuid::Uuid;

use crate::blog::{Blog, BlogContent, BlogStatus};
use crate::error::Result;

const BLOG_COLUMNS: &str = "id, title, thumbnail, content, status, date";

#[derive(Clone)]
pub struct BlogRepository {
    pool: PgPool,
}

impl BlogRepository {
    /// Create a new [`BlogRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a post; the creation date is assigned by the server.
    pub async fn insert(&self, blog: &BlogContent) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO blogs (title, thumbnail, content, status)
                VALUES ($1, $2, $3, $4)
                RETURNING id"#,
        )
        .bind(&blog.title)
        .bind(&blog.thumbnail)
        .bind(&blog.content)
        .bind(blog.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Find a post by id.
    pub async fn find(&self, id: Uuid) -> Result<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    /// Every post regardless of status, newest first.
    pub async fn list_all(&self) -> Result<Vec<Blog>> {
        let blogs = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    /// Published posts only, newest first.
    pub async fn list_published(&self) -> Result<Vec<Blog>> {
        let blogs = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE status = 'published' ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    /// Replace title, thumbnail, content and status of a post.
    pub async fn replace(&self, id: Uuid, blog: &BlogContent) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE blogs SET title = $2, thumbnail = $3, content = $4, status = $5
                WHERE id = $1"#,
        )
        .bind(id)
        .bind(&blog.title)
        .bind(&blog.thumbnail)
        .bind(&blog.content)
        .bind(blog.status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Set only the `status` field.
    pub async fn set_status(&self, id: Uuid, status: BlogStatus) -> Result<u64> {
        let result = sqlx::query("UPDATE blogs SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete a post by id.
    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
