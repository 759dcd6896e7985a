//! User GraphQL type
//!
//! This module defines the GraphQL type for users with relationship
//! resolvers. Every relationship goes through a request-scoped loader, so a
//! list of users resolves each relationship with one batched store call.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::models::User as DbUser;

use super::post::Post;
use super::profile::Profile;
use super::{load_error, loaders};

/// User exposed via GraphQL
pub struct User {
    inner: DbUser,
}

impl User {
    /// Create a new GraphQL User from a database User
    pub fn new(user: DbUser) -> Self {
        Self { inner: user }
    }
}

impl From<DbUser> for User {
    fn from(user: DbUser) -> Self {
        Self::new(user)
    }
}

#[Object]
impl User {
    /// Unique user identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Display name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Account balance
    async fn balance(&self) -> f64 {
        self.inner.balance
    }

    // Relationship resolvers

    /// Profile of this user, if one was created
    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        let profile = loaders(ctx)?
            .profile_by_user_id
            .load(self.inner.id)
            .await
            .map_err(load_error)?;
        Ok(profile.map(Profile::from))
    }

    /// Posts written by this user (empty when there are none)
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let posts = loaders(ctx)?
            .posts_by_author
            .load(self.inner.id)
            .await
            .map_err(load_error)?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Authors this user subscribes to
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let authors = loaders(ctx)?
            .user_subscribed_to
            .load(self.inner.id)
            .await
            .map_err(load_error)?;
        Ok(authors.into_iter().map(User::from).collect())
    }

    /// Users subscribed to this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let subscribers = loaders(ctx)?
            .subscribed_to_user
            .load(self.inner.id)
            .await
            .map_err(load_error)?;
        Ok(subscribers.into_iter().map(User::from).collect())
    }
}
