//! Shared utility functions for repositories
//!
//! This module provides the SELECT column lists and the mapping from
//! constraint violations to API errors used across repositories.

use crate::error::ApiError;

// ============================================================================
// SQL Column Constants
// ============================================================================

/// SQL columns for member type queries
pub const MEMBER_TYPE_COLUMNS: &str = "id, discount, posts_limit_per_month";

/// SQL columns for user queries
pub const USER_COLUMNS: &str = "id, name, balance";

/// SQL columns for profile queries
pub const PROFILE_COLUMNS: &str = "id, is_male, year_of_birth, user_id, member_type_id";

/// SQL columns for post queries
pub const POST_COLUMNS: &str = "id, title, content, author_id";

/// SQL columns for subscription queries
pub const SUBSCRIPTION_COLUMNS: &str = "subscriber_id, author_id";

/// Map a failed INSERT/UPDATE to an API error
///
/// Unique violations become `Conflict` for `resource` identified by `id`;
/// foreign key violations mean a referenced row is missing and become
/// `ValidationError`. Everything else stays a database error.
pub fn map_write_error(resource: &'static str, id: impl ToString, err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ApiError::conflict(resource, id);
        }
        if db_err.is_foreign_key_violation() {
            return ApiError::ValidationError(format!(
                "{} references a record that does not exist",
                resource
            ));
        }
    }
    ApiError::Database(err)
}
