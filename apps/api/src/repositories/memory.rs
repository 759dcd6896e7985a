//! In-memory [`SocialStore`]
//!
//! Keeps every table in insertion order behind one `RwLock`, which stands in
//! for persistence order. Each bulk find is counted per operation so tests
//! can assert how many round trips a query caused.
//!
//! # Lock Poisoning Recovery
//!
//! Locks are taken with `unwrap_or_else(|e| e.into_inner())`, so a panic in
//! one test does not cascade into `PoisonError`s elsewhere.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::SocialStore;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreatePost, CreateProfile, CreateUser, MemberType, MemberTypeId, Post, Profile, Subscription,
    UpdatePost, UpdateProfile, UpdateUser, User,
};

#[derive(Default)]
struct Tables {
    member_types: Vec<MemberType>,
    users: Vec<User>,
    profiles: Vec<Profile>,
    posts: Vec<Post>,
    subscriptions: Vec<Subscription>,
}

impl Tables {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// Process-local store seeded with the member type catalogue
pub struct MemoryStore {
    tables: RwLock<Tables>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<String>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create a store holding only the seeded member types
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                member_types: MemberType::seeded(),
                ..Tables::default()
            }),
            calls: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Number of times the named bulk find ran (e.g. `"find_users_by_ids"`)
    pub fn calls(&self, operation: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(operation).copied().unwrap_or(0)
    }

    /// Total number of bulk finds across all operations
    pub fn total_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.values().sum()
    }

    /// Forget all recorded calls
    pub fn reset_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Make every subsequent read fail with `StoreUnavailable` until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make one bulk find fail with `StoreUnavailable` from now on
    pub fn fail_on(&self, operation: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(operation.to_string());
    }

    fn read(&self, operation: &'static str) -> ApiResult<RwLockReadGuard<'_, Tables>> {
        *self
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(operation)
            .or_insert(0) += 1;

        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(operation);
        if failing || self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::StoreUnavailable(format!(
                "{} failed: memory store switched off",
                operation
            )));
        }
        Ok(self.tables.read().unwrap_or_else(|e| e.into_inner()))
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Records of `rows` whose `key` is in `keys`, in table order
fn select<T: Clone, K: Eq + std::hash::Hash>(
    rows: &[T],
    keys: &[K],
    key: impl Fn(&T) -> K,
) -> Vec<T> {
    let wanted: HashSet<&K> = keys.iter().collect();
    rows.iter()
        .filter(|row| wanted.contains(&key(row)))
        .cloned()
        .collect()
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn ping(&self) -> ApiResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::StoreUnavailable(
                "memory store switched off".to_string(),
            ));
        }
        Ok(())
    }

    async fn find_all_member_types(&self) -> ApiResult<Vec<MemberType>> {
        Ok(self.read("find_all_member_types")?.member_types.clone())
    }

    async fn find_member_types_by_ids(&self, ids: &[MemberTypeId]) -> ApiResult<Vec<MemberType>> {
        let tables = self.read("find_member_types_by_ids")?;
        Ok(select(&tables.member_types, ids, |m| m.id))
    }

    async fn find_all_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.read("find_all_users")?.users.clone())
    }

    async fn find_users_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<User>> {
        let tables = self.read("find_users_by_ids")?;
        Ok(select(&tables.users, ids, |u| u.id))
    }

    async fn create_user(&self, input: CreateUser) -> ApiResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            balance: input.balance,
        };
        self.write().users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> ApiResult<Option<User>> {
        let mut tables = self.write();
        Ok(tables.users.iter_mut().find(|u| u.id == id).map(|user| {
            input.apply(user);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> ApiResult<bool> {
        let mut tables = self.write();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }
        tables.profiles.retain(|p| p.user_id != id);
        tables.posts.retain(|p| p.author_id != id);
        tables
            .subscriptions
            .retain(|s| s.subscriber_id != id && s.author_id != id);
        Ok(true)
    }

    async fn find_all_profiles(&self) -> ApiResult<Vec<Profile>> {
        Ok(self.read("find_all_profiles")?.profiles.clone())
    }

    async fn find_profiles_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Profile>> {
        let tables = self.read("find_profiles_by_ids")?;
        Ok(select(&tables.profiles, ids, |p| p.id))
    }

    async fn find_profiles_by_user_ids(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Profile>> {
        let tables = self.read("find_profiles_by_user_ids")?;
        Ok(select(&tables.profiles, user_ids, |p| p.user_id))
    }

    async fn create_profile(&self, input: CreateProfile) -> ApiResult<Profile> {
        let mut tables = self.write();
        if !tables.user_exists(input.user_id) {
            return Err(ApiError::ValidationError(
                "profile references a record that does not exist".to_string(),
            ));
        }
        if tables.profiles.iter().any(|p| p.user_id == input.user_id) {
            return Err(ApiError::conflict("profile", input.user_id));
        }
        let profile = Profile {
            id: Uuid::new_v4(),
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            user_id: input.user_id,
            member_type_id: input.member_type_id,
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> ApiResult<Option<Profile>> {
        let mut tables = self.write();
        Ok(tables.profiles.iter_mut().find(|p| p.id == id).map(|profile| {
            input.apply(profile);
            profile.clone()
        }))
    }

    async fn delete_profile(&self, id: Uuid) -> ApiResult<bool> {
        let mut tables = self.write();
        let before = tables.profiles.len();
        tables.profiles.retain(|p| p.id != id);
        Ok(tables.profiles.len() != before)
    }

    async fn find_all_posts(&self) -> ApiResult<Vec<Post>> {
        Ok(self.read("find_all_posts")?.posts.clone())
    }

    async fn find_posts_by_ids(&self, ids: &[Uuid]) -> ApiResult<Vec<Post>> {
        let tables = self.read("find_posts_by_ids")?;
        Ok(select(&tables.posts, ids, |p| p.id))
    }

    async fn find_posts_by_author_ids(&self, author_ids: &[Uuid]) -> ApiResult<Vec<Post>> {
        let tables = self.read("find_posts_by_author_ids")?;
        Ok(select(&tables.posts, author_ids, |p| p.author_id))
    }

    async fn create_post(&self, input: CreatePost) -> ApiResult<Post> {
        let mut tables = self.write();
        if !tables.user_exists(input.author_id) {
            return Err(ApiError::ValidationError(
                "post references a record that does not exist".to_string(),
            ));
        }
        let post = Post {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            author_id: input.author_id,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: Uuid, input: UpdatePost) -> ApiResult<Option<Post>> {
        let mut tables = self.write();
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|post| {
            input.apply(post);
            post.clone()
        }))
    }

    async fn delete_post(&self, id: Uuid) -> ApiResult<bool> {
        let mut tables = self.write();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() != before)
    }

    async fn find_subscriptions_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> ApiResult<Vec<Subscription>> {
        let tables = self.read("find_subscriptions_by_subscriber_ids")?;
        Ok(select(&tables.subscriptions, subscriber_ids, |s| s.subscriber_id))
    }

    async fn find_subscriptions_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> ApiResult<Vec<Subscription>> {
        let tables = self.read("find_subscriptions_by_author_ids")?;
        Ok(select(&tables.subscriptions, author_ids, |s| s.author_id))
    }

    async fn find_subscriptions_touching(&self, user_ids: &[Uuid]) -> ApiResult<Vec<Subscription>> {
        let tables = self.read("find_subscriptions_touching")?;
        let wanted: HashSet<&Uuid> = user_ids.iter().collect();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|s| wanted.contains(&s.subscriber_id) || wanted.contains(&s.author_id))
            .copied()
            .collect())
    }

    async fn create_subscription(&self, subscription: Subscription) -> ApiResult<()> {
        let mut tables = self.write();
        if !tables.user_exists(subscription.subscriber_id)
            || !tables.user_exists(subscription.author_id)
        {
            return Err(ApiError::ValidationError(
                "subscription references a record that does not exist".to_string(),
            ));
        }
        if tables.subscriptions.contains(&subscription) {
            return Err(ApiError::conflict(
                "subscription",
                format!("{}->{}", subscription.subscriber_id, subscription.author_id),
            ));
        }
        tables.subscriptions.push(subscription);
        Ok(())
    }

    async fn delete_subscription(&self, subscription: Subscription) -> ApiResult<bool> {
        let mut tables = self.write();
        let before = tables.subscriptions.len();
        tables.subscriptions.retain(|s| *s != subscription);
        Ok(tables.subscriptions.len() != before)
    }
}
