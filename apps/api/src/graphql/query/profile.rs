//! Profile queries

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::error::ApiError;
use crate::graphql::priming::prime_profiles;
use crate::graphql::types::{load_error, loaders, Profile};
use crate::repositories::DynStore;

#[derive(Default)]
pub struct ProfileQuery;

#[Object]
impl ProfileQuery {
    /// All profiles
    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let store = ctx.data::<DynStore>()?;
        let profiles = store
            .find_all_profiles()
            .await
            .map_err(ApiError::into_graphql)?;
        prime_profiles(loaders(ctx)?, &profiles);
        Ok(profiles.into_iter().map(Profile::from).collect())
    }

    /// Get a profile by ID
    async fn profile(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Profile>> {
        let profile = loaders(ctx)?.profile.load(id).await.map_err(load_error)?;
        Ok(profile.map(Profile::from))
    }
}
