//! PostgreSQL-backed [`SocialStore`]

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use socialgraph_shared_config::DatabaseConfig;

use super::utils::map_write_error;
use super::{
    MemberTypeRepository, PostRepository, ProfileRepository, SocialStore,
    SubscriptionRepository, UserRepository,
};
use crate::error::ApiResult;
use crate::models::{
    CreatePost, CreateProfile, CreateUser, MemberType, MemberTypeId, Post, Profile, Subscription,
    UpdatePost, UpdateProfile, UpdateUser, User,
};

/// Store that delegates to the per-entity repositories over one pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    member_types: MemberTypeRepository,
    users: UserRepository,
    profiles: ProfileRepository,
    posts: PostRepository,
    subscriptions: SubscriptionRepository,
}

impl PgStore {
    /// Build a store over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            member_types: MemberTypeRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            subscriptions: SubscriptionRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a pool from configuration and run pending migrations
    pub async fn connect(config: &DatabaseConfig) -> ApiResult<Self> {
        tracing::info!("Connecting to database...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await?;
        tracing::info!("Database connection established");

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations completed successfully");

        Ok(Self::new(pool))
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SocialStore for PgStore {
    async fn ping(&self) -> ApiResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_all_member_types(&self) -> ApiResult<Vec<MemberType>> {
        Ok(self.member_types.find_all().await?)
    }

    async fn find_member_types_by_ids(&self, ids: &[MemberTypeId]) -> ApiResult<Vec<MemberType>> {
        Ok(self.member_types.find_by_ids(ids).await?)
    }

    async fn find_all_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.users.find_all().await?)
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<User>> {
        Ok(self.users.find_by_ids(ids).await?)
    }

    async fn create_user(&self, input: CreateUser) -> ApiResult<User> {
        let id = Uuid::new_v4();
        self.users
            .create(id, &input)
            .await
            .map_err(|e| map_write_error("user", id, e))
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> ApiResult<Option<User>> {
        self.users
            .update(id, &input)
            .await
            .map_err(|e| map_write_error("user", id, e))
    }

    async fn delete_user(&self, id: Uuid) -> ApiResult<bool> {
        Ok(self.users.delete(id).await?)
    }

    async fn find_all_profiles(&self) -> ApiResult<Vec<Profile>> {
        Ok(self.profiles.find_all().await?)
    }

    async fn find_profiles_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Profile>> {
        Ok(self.profiles.find_by_ids(ids).await?)
    }

    async fn find_profiles_by_user_ids(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Profile>> {
        Ok(self.profiles.find_by_user_ids(user_ids).await?)
    }

    async fn create_profile(&self, input: CreateProfile) -> ApiResult<Profile> {
        let user_id = input.user_id;
        self.profiles
            .create(Uuid::new_v4(), &input)
            .await
            .map_err(|e| map_write_error("profile", user_id, e))
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> ApiResult<Option<Profile>> {
        self.profiles
            .update(id, &input)
            .await
            .map_err(|e| map_write_error("profile", id, e))
    }

    async fn delete_profile(&self, id: Uuid) -> ApiResult<bool> {
        Ok(self.profiles.delete(id).await?)
    }

    async fn find_all_posts(&self) -> ApiResult<Vec<Post>> {
        Ok(self.posts.find_all().await?)
    }

    async fn find_posts_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Post>> {
        Ok(self.posts.find_by_ids(ids).await?)
    }

    async fn find_posts_by_author_ids(&self, author_ids: &[Uuid]) -> ApiResult<Vec<Post>> {
        Ok(self.posts.find_by_author_ids(author_ids).await?)
    }

    async fn create_post(&self, input: CreatePost) -> ApiResult<Post> {
        let id = Uuid::new_v4();
        self.posts
            .create(id, &input)
            .await
            .map_err(|e| map_write_error("post", id, e))
    }

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ApiResult<Option<Post>> {
        self.posts
            .update(id, &input)
            .await
            .map_err(|e| map_write_error("post", id, e))
    }

    async fn delete_post(&self, id: Uuid) -> ApiResult<bool> {
        Ok(self.posts.delete(id).await?)
    }

    async fn find_subscriptions_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> ApiResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .find_by_subscriber_ids(subscriber_ids)
            .await?)
    }

    async fn find_subscriptions_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> ApiResult<Vec<Subscription>> {
        Ok(self.subscriptions.find_by_author_ids(author_ids).await?)
    }

    async fn find_subscriptions_touching(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Subscription>> {
        Ok(self.subscriptions.find_touching(user_ids).await?)
    }

    async fn create_subscription(&self, subscription: Subscription) -> ApiResult<()> {
        self.subscriptions
            .create(subscription)
            .await
            .map_err(|e| {
                map_write_error(
                    "subscription",
                    format!("{}->{}", subscription.subscriber_id, subscription.author_id),
                    e,
                )
            })
    }

    async fn delete_subscription(&self, subscription: Subscription) -> ApiResult<bool> {
        Ok(self.subscriptions.delete(subscription).await?)
    }
}
