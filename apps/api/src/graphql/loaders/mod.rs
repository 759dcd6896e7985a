//! Batch loaders for GraphQL
//!
//! This module provides request-scoped loaders that solve N+1 query problems
//! in relationship resolvers. Each loader batches the lookups issued during
//! one tick into a single store call and caches the results for the rest of
//! the request.
//!
//! There are two types of loaders:
//! - Single-entity loaders: Return `Option<T>` for a single entity by key
//! - Collection loaders: Return `Vec<T>` for related entities by parent ID

mod batch;
mod member_type;
mod post;
mod posts_by_author;
mod profile;
mod subscriptions;
mod user;

pub use batch::{BatchFn, BatchLoader, LoaderSettings};
pub use member_type::MemberTypeLoader;
pub use post::PostLoader;
pub use posts_by_author::PostsByAuthorLoader;
pub use profile::{ProfileByUserLoader, ProfileLoader};
pub use subscriptions::{resolve_all, Direction, SubscriptionLoader};
pub use user::UserLoader;

use uuid::Uuid;

use crate::models::MemberTypeId;
use crate::repositories::DynStore;

/// One loader of each kind, built fresh for every request
///
/// The GraphQL handler creates a registry per request and attaches it to
/// the request data, so no cache or batch is ever shared between requests.
#[derive(Clone)]
pub struct LoaderRegistry {
    pub member_type: BatchLoader<MemberTypeId, MemberTypeLoader>,
    pub user: BatchLoader<Uuid, UserLoader>,
    pub post: BatchLoader<Uuid, PostLoader>,
    pub profile: BatchLoader<Uuid, ProfileLoader>,
    pub profile_by_user_id: BatchLoader<Uuid, ProfileByUserLoader>,
    pub posts_by_author: BatchLoader<Uuid, PostsByAuthorLoader>,
    pub user_subscribed_to: BatchLoader<Uuid, SubscriptionLoader>,
    pub subscribed_to_user: BatchLoader<Uuid, SubscriptionLoader>,
}

impl LoaderRegistry {
    pub fn new(store: DynStore, settings: &LoaderSettings) -> Self {
        Self {
            member_type: BatchLoader::new(MemberTypeLoader::new(store.clone()), settings.clone()),
            user: BatchLoader::new(UserLoader::new(store.clone()), settings.clone()),
            post: BatchLoader::new(PostLoader::new(store.clone()), settings.clone()),
            profile: BatchLoader::new(ProfileLoader::new(store.clone()), settings.clone()),
            profile_by_user_id: BatchLoader::new(
                ProfileByUserLoader::new(store.clone()),
                settings.clone(),
            ),
            posts_by_author: BatchLoader::new(
                PostsByAuthorLoader::new(store.clone()),
                settings.clone(),
            ),
            user_subscribed_to: BatchLoader::new(
                SubscriptionLoader::user_subscribed_to(store.clone()),
                settings.clone(),
            ),
            subscribed_to_user: BatchLoader::new(
                SubscriptionLoader::subscribed_to_user(store),
                settings.clone(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreatePost, CreateUser};
    use crate::repositories::{MemoryStore, SocialStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_registries_do_not_share_batches_or_caches() {
        let store = Arc::new(MemoryStore::new());
        let author = store
            .create_user(CreateUser {
                name: "Ann".to_string(),
                balance: 0.0,
            })
            .await
            .unwrap();

        let first = LoaderRegistry::new(store.clone(), &LoaderSettings::default());
        let second = LoaderRegistry::new(store.clone(), &LoaderSettings::default());

        let (a, b) = tokio::join!(first.user.load(author.id), second.user.load(author.id));
        assert_eq!(a.unwrap(), Some(author.clone()));
        assert_eq!(b.unwrap(), Some(author.clone()));
        assert_eq!(store.calls("find_users_by_ids"), 2);

        first.user.load(author.id).await.unwrap();
        assert_eq!(store.calls("find_users_by_ids"), 2);
    }

    #[tokio::test]
    async fn test_author_without_posts_gets_empty_list() {
        let store = Arc::new(MemoryStore::new());
        let ann = store
            .create_user(CreateUser {
                name: "Ann".to_string(),
                balance: 0.0,
            })
            .await
            .unwrap();
        let bob = store
            .create_user(CreateUser {
                name: "Bob".to_string(),
                balance: 0.0,
            })
            .await
            .unwrap();
        store
            .create_post(CreatePost {
                title: "hello".to_string(),
                content: "world".to_string(),
                author_id: ann.id,
            })
            .await
            .unwrap();

        let registry = LoaderRegistry::new(store.clone(), &LoaderSettings::default());
        let posts = registry
            .posts_by_author
            .load_many([ann.id, bob.id])
            .await
            .unwrap();

        assert_eq!(posts[0].len(), 1);
        assert!(posts[1].is_empty());
        assert_eq!(store.calls("find_posts_by_author_ids"), 1);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_loader_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_unavailable(true);
        let registry = LoaderRegistry::new(store.clone(), &LoaderSettings::default());

        let err = registry.member_type.load(MemberTypeId::Basic).await.unwrap_err();
        assert_eq!(err.loader(), "member_type");

        store.set_unavailable(false);
        let basic = registry.member_type.load(MemberTypeId::Basic).await.unwrap();
        assert_eq!(basic.map(|m| m.posts_limit_per_month), Some(20));
    }
}
