//! Member type GraphQL type

use async_graphql::Object;

use crate::models::{MemberType as DbMemberType, MemberTypeId};

/// Member tier exposed via GraphQL
pub struct MemberType {
    inner: DbMemberType,
}

impl From<DbMemberType> for MemberType {
    fn from(member_type: DbMemberType) -> Self {
        Self { inner: member_type }
    }
}

#[Object]
impl MemberType {
    async fn id(&self) -> MemberTypeId {
        self.inner.id
    }

    /// Discount granted to members of this tier (percent)
    async fn discount(&self) -> f64 {
        self.inner.discount
    }

    /// Posts a member may publish per month
    async fn posts_limit_per_month(&self) -> i32 {
        self.inner.posts_limit_per_month
    }
}
