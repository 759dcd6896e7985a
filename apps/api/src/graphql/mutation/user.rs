//! User mutations for socialgraph GraphQL API
//!
//! - createUser: Create a user
//! - changeUser: Update name and/or balance
//! - deleteUser: Delete a user with its profile, posts and subscriptions

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::types::{loaders, User};
use crate::models::{CreateUser, UpdateUser};
use crate::repositories::DynStore;

use super::validate_text;

/// Input for creating a user
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    pub name: String,
    pub balance: f64,
}

impl From<CreateUserInput> for CreateUser {
    fn from(input: CreateUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

/// Input for changing a user; omitted fields stay as they are
#[derive(Debug, Clone, InputObject)]
pub struct ChangeUserInput {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

impl From<ChangeUserInput> for UpdateUser {
    fn from(input: ChangeUserInput) -> Self {
        Self {
            name: input.name,
            balance: input.balance,
        }
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, dto: CreateUserInput) -> Result<User> {
        validate_text("name", &dto.name).map_err(ApiError::into_graphql)?;

        let store = ctx.data::<DynStore>()?;
        let user = store
            .create_user(dto.into())
            .await
            .map_err(ApiError::into_graphql)?;

        let registry = loaders(ctx)?;
        registry.user.force_prime(user.id, Some(user.clone()));
        registry.posts_by_author.force_prime(user.id, Vec::new());
        registry.user_subscribed_to.force_prime(user.id, Vec::new());
        registry.subscribed_to_user.force_prime(user.id, Vec::new());

        tracing::info!(user_id = %user.id, "User created");
        Ok(User::from(user))
    }

    async fn change_user(&self, ctx: &Context<'_>, id: Uuid, dto: ChangeUserInput) -> Result<User> {
        if let Some(name) = &dto.name {
            validate_text("name", name).map_err(ApiError::into_graphql)?;
        }

        let store = ctx.data::<DynStore>()?;
        let user = store
            .update_user(id, dto.into())
            .await
            .map_err(ApiError::into_graphql)?
            .ok_or_else(|| ApiError::not_found("user", id).into_graphql())?;

        let registry = loaders(ctx)?;
        registry.user.force_prime(id, Some(user.clone()));
        // Subscription lists embed whole users
        registry.user_subscribed_to.clear_all();
        registry.subscribed_to_user.clear_all();
        Ok(User::from(user))
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: Uuid) -> Result<String> {
        let store = ctx.data::<DynStore>()?;
        let deleted = store.delete_user(id).await.map_err(ApiError::into_graphql)?;
        if !deleted {
            return Err(ApiError::not_found("user", id).into_graphql());
        }

        let registry = loaders(ctx)?;
        registry.user.force_prime(id, None);
        registry.profile_by_user_id.force_prime(id, None);
        registry.posts_by_author.force_prime(id, Vec::new());
        // The cascade also removed the user's posts, profile and subscription edges
        registry.post.clear_all();
        registry.profile.clear_all();
        registry.user_subscribed_to.clear_all();
        registry.subscribed_to_user.clear_all();

        tracing::info!(user_id = %id, "User deleted");
        Ok("User deleted successfully".to_string())
    }
}
