//! GraphQL type definitions for socialgraph
//!
//! Each type wraps its database model and resolves relationships through the
//! request's [`LoaderRegistry`](crate::graphql::loaders::LoaderRegistry).

mod member_type;
mod post;
mod profile;
mod user;

pub use member_type::MemberType;
pub use post::Post;
pub use profile::Profile;
pub use user::User;

use async_graphql::Context;

use crate::error::{ApiError, LoaderError};
use crate::graphql::loaders::LoaderRegistry;

/// Loader registry attached to the current request
pub(crate) fn loaders<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a LoaderRegistry> {
    ctx.data::<LoaderRegistry>()
}

/// Turn a failed load into a field error
pub(crate) fn load_error(err: LoaderError) -> async_graphql::Error {
    ApiError::from(err).into_graphql()
}
