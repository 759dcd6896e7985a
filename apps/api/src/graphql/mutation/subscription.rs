//! Subscription mutations for socialgraph GraphQL API
//!
//! - subscribeTo: `userId` starts following `authorId`, returns the subscriber
//! - unsubscribeFrom: removes the edge, returns whether one was removed

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::loaders::LoaderRegistry;
use crate::graphql::types::{load_error, loaders, User};
use crate::models::Subscription;
use crate::repositories::DynStore;

use super::require_user;

#[derive(Default)]
pub struct SubscriptionMutation;

#[Object]
impl SubscriptionMutation {
    async fn subscribe_to(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<User> {
        require_user(ctx, author_id).await?;
        let subscriber = loaders(ctx)?
            .user
            .load(user_id)
            .await
            .map_err(load_error)?
            .ok_or_else(|| ApiError::not_found("user", user_id).into_graphql())?;

        let store = ctx.data::<DynStore>()?;
        store
            .create_subscription(Subscription::new(user_id, author_id))
            .await
            .map_err(ApiError::into_graphql)?;

        forget_edge(loaders(ctx)?, user_id, author_id);
        tracing::info!(subscriber_id = %user_id, author_id = %author_id, "Subscribed");
        Ok(User::from(subscriber))
    }

    async fn unsubscribe_from(
        &self,
        ctx: &Context<'_>,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool> {
        let store = ctx.data::<DynStore>()?;
        match store
            .delete_subscription(Subscription::new(user_id, author_id))
            .await
        {
            Ok(removed) => {
                if removed {
                    forget_edge(loaders(ctx)?, user_id, author_id);
                }
                Ok(removed)
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    subscriber_id = %user_id,
                    author_id = %author_id,
                    "Unsubscribe failed"
                );
                Ok(false)
            }
        }
    }
}

/// Drop both cached sides of a subscription edge that just changed
fn forget_edge(registry: &LoaderRegistry, subscriber_id: Uuid, author_id: Uuid) {
    registry.user_subscribed_to.clear(&subscriber_id);
    registry.subscribed_to_user.clear(&author_id);
}
