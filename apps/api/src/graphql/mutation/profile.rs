//! Profile mutations for socialgraph GraphQL API
//!
//! A user has at most one profile; creating a second one is a conflict.

use async_graphql::{Context, InputObject, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::types::{load_error, loaders, Profile};
use crate::models::{CreateProfile, MemberTypeId, UpdateProfile};
use crate::repositories::DynStore;

use super::require_user;

/// Input for creating a profile
#[derive(Debug, Clone, InputObject)]
pub struct CreateProfileInput {
    pub user_id: Uuid,
    pub is_male: bool,
    pub year_of_birth: i32,
    pub member_type_id: MemberTypeId,
}

impl From<CreateProfileInput> for CreateProfile {
    fn from(input: CreateProfileInput) -> Self {
        Self {
            user_id: input.user_id,
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id,
        }
    }
}

/// Input for changing a profile; omitted fields stay as they are
#[derive(Debug, Clone, InputObject)]
pub struct ChangeProfileInput {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<MemberTypeId>,
}

impl From<ChangeProfileInput> for UpdateProfile {
    fn from(input: ChangeProfileInput) -> Self {
        Self {
            is_male: input.is_male,
            year_of_birth: input.year_of_birth,
            member_type_id: input.member_type_id,
        }
    }
}

#[derive(Default)]
pub struct ProfileMutation;

#[Object]
impl ProfileMutation {
    async fn create_profile(&self, ctx: &Context<'_>, dto: CreateProfileInput) -> Result<Profile> {
        require_user(ctx, dto.user_id).await?;

        let store = ctx.data::<DynStore>()?;
        let profile = store
            .create_profile(dto.into())
            .await
            .map_err(ApiError::into_graphql)?;

        let registry = loaders(ctx)?;
        registry.profile.force_prime(profile.id, Some(profile.clone()));
        registry
            .profile_by_user_id
            .force_prime(profile.user_id, Some(profile.clone()));

        tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "Profile created");
        Ok(Profile::from(profile))
    }

    async fn change_profile(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        dto: ChangeProfileInput,
    ) -> Result<Profile> {
        let store = ctx.data::<DynStore>()?;
        let profile = store
            .update_profile(id, dto.into())
            .await
            .map_err(ApiError::into_graphql)?
            .ok_or_else(|| ApiError::not_found("profile", id).into_graphql())?;

        let registry = loaders(ctx)?;
        registry.profile.force_prime(id, Some(profile.clone()));
        registry
            .profile_by_user_id
            .force_prime(profile.user_id, Some(profile.clone()));
        Ok(Profile::from(profile))
    }

    async fn delete_profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<String> {
        let registry = loaders(ctx)?;
        let existing = registry.profile.load(id).await.map_err(load_error)?;

        let store = ctx.data::<DynStore>()?;
        let deleted = store
            .delete_profile(id)
            .await
            .map_err(ApiError::into_graphql)?;
        let Some(existing) = existing.filter(|_| deleted) else {
            return Err(ApiError::not_found("profile", id).into_graphql());
        };

        registry.profile.force_prime(id, None);
        registry.profile_by_user_id.force_prime(existing.user_id, None);
        Ok("Profile deleted successfully".to_string())
    }
}
