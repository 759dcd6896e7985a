//! User queries
//!
//! `users` primes the subscription loaders when the selection reaches
//! `userSubscribedTo` or `subscribedToUser`, so a full list with both
//! directions costs one join-row fetch.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::priming::{prime_users, selects_subscriptions};
use crate::graphql::types::{load_error, loaders, User};
use crate::repositories::DynStore;

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// All users
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let store = ctx.data::<DynStore>()?;
        let users = store.find_all_users().await.map_err(ApiError::into_graphql)?;
        let registry = loaders(ctx)?;
        if let Err(err) = prime_users(registry, store, &users, selects_subscriptions(ctx)).await {
            // Nested fields fall back to batched loads
            tracing::warn!(error = %err, "Priming users failed");
        }
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Get a user by ID
    async fn user(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<User>> {
        let user = loaders(ctx)?.user.load(id).await.map_err(load_error)?;
        Ok(user.map(User::from))
    }
}
