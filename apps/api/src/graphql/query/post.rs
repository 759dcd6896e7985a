//! Post queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::priming::prime_posts;
use crate::graphql::types::{load_error, loaders, Post};
use crate::repositories::DynStore;

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// All posts
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let store = ctx.data::<DynStore>()?;
        let posts = store.find_all_posts().await.map_err(ApiError::into_graphql)?;
        prime_posts(loaders(ctx)?, &posts);
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Get a post by ID
    async fn post(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Post>> {
        let post = loaders(ctx)?.post.load(id).await.map_err(load_error)?;
        Ok(post.map(Post::from))
    }
}
