//! Funding records: logged monetary contributions.
//!
//! Append-only from the application's perspective; there is no update or
//! delete surface, only inserts, a descending listing and the exact sum the
//! reporting endpoint folds over.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;

/// Funding record as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FundingRecord {
    pub id: Uuid,
    pub email: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

#[derive(Clone)]
pub struct FundingRepository {
    pool: PgPool,
}

impl FundingRepository {
    /// Create a new [`FundingRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a contribution. The date defaults to now.
    pub async fn insert(
        &self,
        email: &str,
        amount: Decimal,
        date: Option<DateTime<Utc>>,
    ) -> Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO funding (email, amount, date)
                VALUES ($1, $2, COALESCE($3, now()))
                RETURNING id"#,
        )
        .bind(email)
        .bind(amount)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Every contribution, newest first.
    pub async fn list(&self) -> Result<Vec<FundingRecord>> {
        let records = sqlx::query_as::<_, FundingRecord>(
            "SELECT id, email, amount, date FROM funding ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Exact sum of all recorded amounts.
    pub async fn total(&self) -> Result<Decimal> {
        let total =
            sqlx::query_scalar::<_, Decimal>("SELECT COALESCE(SUM(amount), 0) FROM funding")
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }
}
