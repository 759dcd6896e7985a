//! Subscription join rows for socialgraph
//!
//! A row means `subscriber_id` follows `author_id`. The pair is the primary
//! key of the subscribers_on_authors table.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of the subscribers_on_authors join table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRow, Serialize)]
pub struct Subscription {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

impl Subscription {
    pub fn new(subscriber_id: Uuid, author_id: Uuid) -> Self {
        Self {
            subscriber_id,
            author_id,
        }
    }
}
