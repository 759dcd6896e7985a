//! Member type loader
//!
//! Batches member type lookups from `Profile.memberType` resolvers. The
//! catalogue is tiny, so a whole request usually needs one fetch at most.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::models::{MemberType, MemberTypeId};
use crate::repositories::DynStore;

use super::BatchFn;

/// Batch function for member types by id
#[derive(Clone)]
pub struct MemberTypeLoader {
    store: DynStore,
}

impl MemberTypeLoader {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl BatchFn<MemberTypeId> for MemberTypeLoader {
    type Value = Option<MemberType>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        "member_type"
    }

    async fn fetch(
        &self,
        keys: &[MemberTypeId],
    ) -> Result<HashMap<MemberTypeId, Self::Value>, Self::Error> {
        let member_types = self.store.find_member_types_by_ids(keys).await?;
        Ok(member_types.into_iter().map(|m| (m.id, Some(m))).collect())
    }
}
