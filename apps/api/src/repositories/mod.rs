//! Data access layer for socialgraph
//!
//! The GraphQL layer only talks to [`SocialStore`], the persistence
//! collaborator: bulk finds keyed by id sets or foreign keys, plus the
//! writes the mutations need. Two implementations exist:
//! - [`PgStore`]: PostgreSQL through the per-entity sqlx repositories
//! - [`MemoryStore`]: process-local tables for development and tests

pub mod member_type;
pub mod memory;
pub mod post;
pub mod postgres;
pub mod profile;
pub mod subscription;
pub mod user;
pub mod utils;

pub use member_type::MemberTypeRepository;
pub use memory::MemoryStore;
pub use post::PostRepository;
pub use postgres::PgStore;
pub use profile::ProfileRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::models::{
    CreatePost, CreateProfile, CreateUser, MemberType, MemberTypeId, Post, Profile, Subscription,
    UpdatePost, UpdateProfile, UpdateUser, User,
};

/// Shared handle to the persistence collaborator
pub type DynStore = Arc<dyn SocialStore>;

/// Persistence operations used by loaders, list queries and mutations
///
/// Bulk finds return matching records only, in persistence order; ids with
/// no match are simply absent from the result.
#[async_trait]
pub trait SocialStore: Send + Sync + 'static {
    /// Check that the backend is reachable
    async fn ping(&self) -> ApiResult<()>;

    // ---------- Member types ----------

    async fn find_all_member_types(&self) -> ApiResult<Vec<MemberType>>;

    async fn find_member_types_by_ids(&self, ids: &[MemberTypeId]) -> ApiResult<Vec<MemberType>>;

    // ---------- Users ----------

    async fn find_all_users(&self) -> ApiResult<Vec<User>>;

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<User>>;

    async fn create_user(&self, input: CreateUser) -> ApiResult<User>;

    /// Returns `None` when the user does not exist
    async fn update_user(&self, id: Uuid, input: UpdateUser) -> ApiResult<Option<User>>;

    /// Returns whether a user was deleted; dependents are removed with it
    async fn delete_user(&self, id: Uuid) -> ApiResult<bool>;

    // ---------- Profiles ----------

    async fn find_all_profiles(&self) -> ApiResult<Vec<Profile>>;

    async fn find_profiles_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Profile>>;

    async fn find_profiles_by_user_ids(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Profile>>;

    async fn create_profile(&self, input: CreateProfile) -> ApiResult<Profile>;

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> ApiResult<Option<Profile>>;

    async fn delete_profile(&self, id: Uuid) -> ApiResult<bool>;

    // ---------- Posts ----------

    async fn find_all_posts(&self) -> ApiResult<Vec<Post>>;

    async fn find_posts_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Post>>;

    async fn find_posts_by_author_ids(&self, author_ids: &[Uuid]) -> ApiResult<Vec<Post>>;

    async fn create_post(&self, input: CreatePost) -> ApiResult<Post>;

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ApiResult<Option<Post>>;

    async fn delete_post(&self, id: Uuid) -> ApiResult<bool>;

    // ---------- Subscriptions ----------

    async fn find_subscriptions_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> ApiResult<Vec<Subscription>>;

    async fn find_subscriptions_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> ApiResult<Vec<Subscription>>;

    /// Join rows where either the subscriber or the author is in `user_ids`
    async fn find_subscriptions_touching(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Subscription>>;

    async fn create_subscription(&self, subscription: Subscription) -> ApiResult<()>;

    /// Returns whether the join row existed
    async fn delete_subscription(&self, subscription: Subscription) -> ApiResult<bool>;
}
