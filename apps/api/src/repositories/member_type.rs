//! Member type repository
//!
//! Member types are seeded by migration and read-only at runtime.

use sqlx::PgPool;

use super::utils::MEMBER_TYPE_COLUMNS;
use crate::models::{MemberType, MemberTypeId};

/// Repository for member type database operations
#[derive(Clone)]
pub struct MemberTypeRepository {
    pool: PgPool,
}

impl MemberTypeRepository {
    /// Create a new MemberTypeRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the whole catalogue
    pub async fn find_all(&self) -> Result<Vec<MemberType>, sqlx::Error> {
        let sql = format!("SELECT {} FROM member_types", MEMBER_TYPE_COLUMNS);
        sqlx::query_as::<_, MemberType>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetch member types by id
    pub async fn find_by_ids(&self, ids: &[MemberTypeId]) -> Result<Vec<MemberType>, sqlx::Error> {
        let ids: Vec<&str> = ids.iter().map(MemberTypeId::as_str).collect();
        let sql = format!(
            "SELECT {} FROM member_types WHERE id::text = ANY($1)",
            MEMBER_TYPE_COLUMNS
        );
        sqlx::query_as::<_, MemberType>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }
}
