//! User DataLoader for batched fetching
//!
//! Serves `user(id)`, `Post.author` and `Profile.user`. The `users` list
//! query primes it with every record it returns.

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::User;
use crate::repositories::DynStore;

use super::BatchFn;

/// Batch function for users by id
#[derive(Clone)]
pub struct UserLoader {
    store: DynStore,
}

impl UserLoader {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl BatchFn<Uuid> for UserLoader {
    type Value = Option<User>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        "user"
    }

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let users = self.store.find_users_by_ids(keys).await?;
        Ok(users.into_iter().map(|u| (u.id, Some(u))).collect())
    }
}
