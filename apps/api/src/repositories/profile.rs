//! Profile repository for centralized database operations

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::PROFILE_COLUMNS;
use crate::models::{CreateProfile, Profile, UpdateProfile};

/// Repository for profile database operations
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new ProfileRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every profile in table order
    pub async fn find_all(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let sql = format!("SELECT {} FROM profiles", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql).fetch_all(&self.pool).await
    }

    /// Fetch profiles by their own id
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>, sqlx::Error> {
        let sql = format!("SELECT {} FROM profiles WHERE id = ANY($1)", PROFILE_COLUMNS);
        sqlx::query_as::<_, Profile>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetch profiles by owning user id
    pub async fn find_by_user_ids(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE user_id = ANY($1)",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Insert a new profile
    pub async fn create(&self, id: Uuid, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO profiles (id, is_male, year_of_birth, user_id, member_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}"#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(input.is_male)
            .bind(input.year_of_birth)
            .bind(input.user_id)
            .bind(input.member_type_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Update the set fields of a profile
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let sql = format!(
            r#"UPDATE profiles
            SET is_male = COALESCE($2, is_male),
                year_of_birth = COALESCE($3, year_of_birth),
                member_type_id = COALESCE($4, member_type_id)
            WHERE id = $1
            RETURNING {}"#,
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, Profile>(&sql)
            .bind(id)
            .bind(input.is_male)
            .bind(input.year_of_birth)
            .bind(input.member_type_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a profile
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
