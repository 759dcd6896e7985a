//! Post DataLoader for batched fetching

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Post;
use crate::repositories::DynStore;

use super::BatchFn;

/// Batch function for posts by id
#[derive(Clone)]
pub struct PostLoader {
    store: DynStore,
}

impl PostLoader {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl BatchFn<Uuid> for PostLoader {
    type Value = Option<Post>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        "post"
    }

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let posts = self.store.find_posts_by_ids(keys).await?;
        Ok(posts.into_iter().map(|p| (p.id, Some(p))).collect())
    }
}
