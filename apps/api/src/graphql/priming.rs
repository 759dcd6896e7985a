//! Bulk-fetch priming
//!
//! List queries already hold every record they return, so they seed the
//! per-id loaders with them. Nested resolvers for the same records then hit
//! the cache instead of issuing another batch.
//!
//! For `users`, the subscription relation is primed too when the selection
//! asks for it: the join rows touching the listed users are fetched once,
//! grouped in memory and both directions are primed using the listed users
//! as targets. A key whose targets are not all in the list is left alone and
//! falls back to a batched load.

use std::collections::HashMap;

use async_graphql::Context;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::graphql::loaders::{resolve_all, Direction, LoaderRegistry};
use crate::models::{MemberType, Post, Profile, User};
use crate::repositories::DynStore;

/// GraphQL names of the subscription fields on `User`
const SUBSCRIPTION_FIELDS: [&str; 2] = ["userSubscribedTo", "subscribedToUser"];

/// Whether the current field's selection reaches the subscription relation
pub fn selects_subscriptions(ctx: &Context<'_>) -> bool {
    let look_ahead = ctx.look_ahead();
    SUBSCRIPTION_FIELDS
        .iter()
        .any(|field| look_ahead.field(field).exists())
}

/// Prime the user loader, and the subscription loaders when requested
pub async fn prime_users(
    registry: &LoaderRegistry,
    store: &DynStore,
    users: &[User],
    with_subscriptions: bool,
) -> ApiResult<()> {
    registry
        .user
        .prime_many(users.iter().map(|u| (u.id, Some(u.clone()))));

    if !with_subscriptions || users.is_empty() {
        return Ok(());
    }

    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let rows = store.find_subscriptions_touching(&ids).await?;
    let index: HashMap<Uuid, User> = users.iter().map(|u| (u.id, u.clone())).collect();

    let mut primed = 0;
    for (direction, loader) in [
        (Direction::SubscribedTo, &registry.user_subscribed_to),
        (Direction::Subscribers, &registry.subscribed_to_user),
    ] {
        let (grouped, _) = direction.group(&rows);
        for id in &ids {
            let targets = grouped.get(id).map(Vec::as_slice).unwrap_or_default();
            if let Some(resolved) = resolve_all(targets, &index) {
                if loader.prime(*id, resolved) {
                    primed += 1;
                }
            }
        }
    }

    tracing::debug!(
        users = users.len(),
        rows = rows.len(),
        primed,
        "Primed subscription loaders"
    );
    Ok(())
}

/// Prime the post loader
pub fn prime_posts(registry: &LoaderRegistry, posts: &[Post]) {
    registry
        .post
        .prime_many(posts.iter().map(|p| (p.id, Some(p.clone()))));
}

/// Prime both profile loaders from the same records
pub fn prime_profiles(registry: &LoaderRegistry, profiles: &[Profile]) {
    registry
        .profile
        .prime_many(profiles.iter().map(|p| (p.id, Some(p.clone()))));
    registry
        .profile_by_user_id
        .prime_many(profiles.iter().map(|p| (p.user_id, Some(p.clone()))));
}

/// Prime the member type loader
pub fn prime_member_types(registry: &LoaderRegistry, member_types: &[MemberType]) {
    registry
        .member_type
        .prime_many(member_types.iter().map(|m| (m.id, Some(m.clone()))));
}
