//! Member type queries

use async_graphql::{Context, Object, Result};

use crate::error::ApiError;
use crate::graphql::priming::prime_member_types;
use crate::graphql::types::{load_error, loaders, MemberType};
use crate::models::MemberTypeId;
use crate::repositories::DynStore;

#[derive(Default)]
pub struct MemberTypeQuery;

#[Object]
impl MemberTypeQuery {
    /// All member tiers
    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberType>> {
        let store = ctx.data::<DynStore>()?;
        let member_types = store
            .find_all_member_types()
            .await
            .map_err(ApiError::into_graphql)?;
        prime_member_types(loaders(ctx)?, &member_types);
        Ok(member_types.into_iter().map(MemberType::from).collect())
    }

    /// Get a member tier by ID
    async fn member_type(&self, ctx: &Context<'_>, id: MemberTypeId) -> Result<Option<MemberType>> {
        let member_type = loaders(ctx)?
            .member_type
            .load(id)
            .await
            .map_err(load_error)?;
        Ok(member_type.map(MemberType::from))
    }
}
