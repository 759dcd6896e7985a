//! GraphQL mutations for socialgraph
//!
//! This module contains all mutation resolvers, organized by entity. Every
//! write refreshes the request's per-id loader for the record it touched and
//! clears the collection loaders that embed it, so later fields of the same
//! request read the new state.

mod post;
mod profile;
mod subscription;
mod user;

pub use post::{ChangePostInput, CreatePostInput, PostMutation};
pub use profile::{ChangeProfileInput, CreateProfileInput, ProfileMutation};
pub use subscription::SubscriptionMutation;
pub use user::{ChangeUserInput, CreateUserInput, UserMutation};

use async_graphql::{Context, MergedObject};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::types::{load_error, loaders};

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, ProfileMutation, PostMutation, SubscriptionMutation);

/// Maximum length of free-text fields such as names and titles
const MAX_TEXT_LENGTH: usize = 255;

/// Reject blank or oversized short text fields
fn validate_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

/// Fail with NOT_FOUND unless the user exists
async fn require_user(ctx: &Context<'_>, id: Uuid) -> async_graphql::Result<()> {
    match loaders(ctx)?.user.load(id).await.map_err(load_error)? {
        Some(_) => Ok(()),
        None => Err(ApiError::not_found("user", id).into_graphql()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "Ann").is_ok());
        assert_matches!(validate_text("name", "   "), Err(ApiError::ValidationError(_)));
        assert_matches!(
            validate_text("title", &"x".repeat(MAX_TEXT_LENGTH + 1)),
            Err(ApiError::ValidationError(msg)) if msg.contains("at most")
        );
    }
}
