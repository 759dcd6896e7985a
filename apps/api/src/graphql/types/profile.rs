//! Profile GraphQL type
//!
//! `memberType` is non-null: a profile pointing at a tier the store does not
//! know yields a field error rather than `null`.

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{MemberTypeId, Profile as DbProfile};

use super::member_type::MemberType;
use super::user::User;
use super::{load_error, loaders};

/// Profile exposed via GraphQL
pub struct Profile {
    inner: DbProfile,
}

impl Profile {
    pub fn new(profile: DbProfile) -> Self {
        Self { inner: profile }
    }
}

impl From<DbProfile> for Profile {
    fn from(profile: DbProfile) -> Self {
        Self::new(profile)
    }
}

#[Object]
impl Profile {
    /// Unique profile identifier
    async fn id(&self) -> Uuid {
        self.inner.id
    }

    async fn is_male(&self) -> bool {
        self.inner.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.inner.year_of_birth
    }

    /// Owning user ID
    async fn user_id(&self) -> Uuid {
        self.inner.user_id
    }

    async fn member_type_id(&self) -> MemberTypeId {
        self.inner.member_type_id
    }

    // Relationship resolvers

    /// Member tier of this profile (batched through the member type loader)
    async fn member_type(&self, ctx: &Context<'_>) -> Result<MemberType> {
        let id = self.inner.member_type_id;
        loaders(ctx)?
            .member_type
            .load(id)
            .await
            .map_err(load_error)?
            .map(MemberType::from)
            .ok_or_else(|| ApiError::not_found("member type", id).into_graphql())
    }

    /// Owning user (batched through the user loader)
    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let user = loaders(ctx)?
            .user
            .load(self.inner.user_id)
            .await
            .map_err(load_error)?;
        Ok(user.map(User::from))
    }
}
