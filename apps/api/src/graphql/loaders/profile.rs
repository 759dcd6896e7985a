//! Profile DataLoaders for batched fetching
//!
//! Profiles are reachable two ways: by their own id (`profile(id)`) and by
//! the owning user (`User.profile`). Each lookup has its own loader; both
//! are primed by the `profiles` list query.

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Profile;
use crate::repositories::DynStore;

use super::BatchFn;

/// Batch function for profiles by id
#[derive(Clone)]
pub struct ProfileLoader {
    store: DynStore,
}

impl ProfileLoader {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl BatchFn<Uuid> for ProfileLoader {
    type Value = Option<Profile>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        "profile"
    }

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let profiles = self.store.find_profiles_by_ids(keys).await?;
        Ok(profiles.into_iter().map(|p| (p.id, Some(p))).collect())
    }
}

/// Batch function for profiles keyed by owning user id
#[derive(Clone)]
pub struct ProfileByUserLoader {
    store: DynStore,
}

impl ProfileByUserLoader {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl BatchFn<Uuid> for ProfileByUserLoader {
    type Value = Option<Profile>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        "profile_by_user_id"
    }

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let profiles = self.store.find_profiles_by_user_ids(keys).await?;
        Ok(profiles.into_iter().map(|p| (p.user_id, Some(p))).collect())
    }
}
