//! Handle database requests for the users collection.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::Result;
use crate::user::{DonorFilters, DonorProfile, NewUser, ProfileChanges, Role, User, UserStatus};

const USER_COLUMNS: &str =
    "id, email, name, avatar, blood_group, division, district, upazila, role, status, created_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user unless the email is already taken.
    ///
    /// Returns the new id, or `None` when the record already existed.
    pub async fn insert_if_absent(&self, user: &NewUser) -> Result<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (email, name, avatar, blood_group, division, district, upazila)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (email) DO NOTHING
                RETURNING id"#,
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(&user.blood_group)
        .bind(&user.division)
        .bind(&user.district)
        .bind(&user.upazila)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    /// Find current user using `email` field.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find current user using `id` field.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List every user, newest first.
    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Apply self-service profile changes.
    ///
    /// `role` and `status` are unreachable from here; the privileged
    /// mutators below are the only write path for them.
    pub async fn update_profile(&self, id: Uuid, changes: &ProfileChanges) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE users SET
                name = COALESCE($2, name),
                avatar = COALESCE($3, avatar),
                blood_group = COALESCE($4, blood_group),
                division = COALESCE($5, division),
                district = COALESCE($6, district),
                upazila = COALESCE($7, upazila)
                WHERE id = $1"#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.avatar)
        .bind(&changes.blood_group)
        .bind(&changes.division)
        .bind(&changes.district)
        .bind(&changes.upazila)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Set the `status` field. Admin only, enforced by the caller.
    pub async fn set_status(&self, id: Uuid, status: UserStatus) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Set the `role` field. Admin only, enforced by the caller.
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Public donor discovery.
    ///
    /// Always constrained to active donors; each filter narrows an equality
    /// match. Only the [`DonorProfile`] projection leaves the store.
    pub async fn search_donors(&self, filters: &DonorFilters) -> Result<Vec<DonorProfile>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT name, blood_group, division, district, upazila, avatar FROM users \
             WHERE role = 'donor' AND status = 'active'",
        );

        if let Some(blood_group) = &filters.blood_group {
            query.push(" AND blood_group = ").push_bind(blood_group);
        }
        if let Some(division) = &filters.division {
            query.push(" AND division = ").push_bind(division);
        }
        if let Some(district) = &filters.district {
            query.push(" AND district = ").push_bind(district);
        }
        if let Some(upazila) = &filters.upazila {
            query.push(" AND upazila = ").push_bind(upazila);
        }

        let donors = query
            .build_query_as::<DonorProfile>()
            .fetch_all(&self.pool)
            .await?;

        Ok(donors)
    }

    /// Total number of users.
    pub async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
