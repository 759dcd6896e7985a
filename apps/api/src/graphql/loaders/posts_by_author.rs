//! Posts-by-Author DataLoader for batched fetching
//!
//! This loader batches multiple author ID lookups into a single store call,
//! returning all posts for each author. Authors without posts get an empty
//! list, never a missing value.

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Post;
use crate::repositories::DynStore;

use super::BatchFn;

/// Batch function for posts grouped by author id
#[derive(Clone)]
pub struct PostsByAuthorLoader {
    store: DynStore,
}

impl PostsByAuthorLoader {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

impl BatchFn<Uuid> for PostsByAuthorLoader {
    type Value = Vec<Post>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        "posts_by_author"
    }

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let posts = self.store.find_posts_by_author_ids(keys).await?;

        // Group posts by author_id, keeping persistence order
        let mut result: HashMap<Uuid, Vec<Post>> = HashMap::new();
        for post in posts {
            result.entry(post.author_id).or_default().push(post);
        }
        Ok(result)
    }
}
