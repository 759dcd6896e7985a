//! Post mutations for socialgraph GraphQL API

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::types::{load_error, loaders, Post};
use crate::models::{CreatePost, UpdatePost};
use crate::repositories::DynStore;

use super::{require_user, validate_text};

/// Input for creating a post
#[derive(Debug, Clone, InputObject)]
pub struct CreatePostInput {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
}

impl From<CreatePostInput> for CreatePost {
    fn from(input: CreatePostInput) -> Self {
        Self {
            author_id: input.author_id,
            title: input.title,
            content: input.content,
        }
    }
}

/// Input for changing a post; omitted fields stay as they are
#[derive(Debug, Clone, InputObject)]
pub struct ChangePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<ChangePostInput> for UpdatePost {
    fn from(input: ChangePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
        }
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(&self, ctx: &Context<'_>, dto: CreatePostInput) -> Result<Post> {
        validate_text("title", &dto.title).map_err(ApiError::into_graphql)?;
        require_user(ctx, dto.author_id).await?;

        let store = ctx.data::<DynStore>()?;
        let post = store
            .create_post(dto.into())
            .await
            .map_err(ApiError::into_graphql)?;

        let registry = loaders(ctx)?;
        registry.post.force_prime(post.id, Some(post.clone()));
        registry.posts_by_author.clear(&post.author_id);
        tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");
        Ok(Post::from(post))
    }

    async fn change_post(&self, ctx: &Context<'_>, id: Uuid, dto: ChangePostInput) -> Result<Post> {
        if let Some(title) = &dto.title {
            validate_text("title", title).map_err(ApiError::into_graphql)?;
        }

        let store = ctx.data::<DynStore>()?;
        let post = store
            .update_post(id, dto.into())
            .await
            .map_err(ApiError::into_graphql)?
            .ok_or_else(|| ApiError::not_found("post", id).into_graphql())?;

        let registry = loaders(ctx)?;
        registry.post.force_prime(id, Some(post.clone()));
        registry.posts_by_author.clear(&post.author_id);
        Ok(Post::from(post))
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: Uuid) -> Result<String> {
        let registry = loaders(ctx)?;
        let existing = registry.post.load(id).await.map_err(load_error)?;

        let store = ctx.data::<DynStore>()?;
        let deleted = store.delete_post(id).await.map_err(ApiError::into_graphql)?;
        let Some(existing) = existing.filter(|_| deleted) else {
            return Err(ApiError::not_found("post", id).into_graphql());
        };

        registry.post.force_prime(id, None);
        registry.posts_by_author.clear(&existing.author_id);
        Ok("Post deleted successfully".to_string())
    }
}
