//! Post GraphQL type

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::models::Post as DbPost;

use super::user::User;
use super::{load_error, loaders};

/// Post exposed via GraphQL
pub struct Post {
    inner: DbPost,
}

impl Post {
    pub fn new(post: DbPost) -> Self {
        Self { inner: post }
    }
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self::new(post)
    }
}

#[Object]
impl Post {
    /// Unique post identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn title(&self) -> &str {
        &self.inner.title
    }

    async fn content(&self) -> &str {
        &self.inner.content
    }

    async fn author_id(&self) -> Uuid {
        self.inner.author_id
    }

    // Relationship resolvers

    /// Author of this post (batched through the user loader)
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let author = loaders(ctx)?
            .user
            .load(self.inner.author_id)
            .await
            .map_err(load_error)?;
        Ok(author.map(User::from))
    }
}
