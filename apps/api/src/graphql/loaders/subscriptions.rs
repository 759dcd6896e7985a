//! Subscription loaders (many-to-many through subscribers_on_authors)
//!
//! One batch function serves both directions of the relation:
//! - `user_subscribed_to`: keyed by subscriber, yields the authors
//! - `subscribed_to_user`: keyed by author, yields the subscribers
//!
//! A batch runs in two phases. First the join rows for every key are fetched
//! and the opposite side's ids are grouped per key in persistence order.
//! Then the distinct target users are fetched in one call, indexed by id and
//! re-attached to each key.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Subscription, User};
use crate::repositories::DynStore;

use super::BatchFn;

/// Side of the join row a subscription loader is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Key is the subscriber, targets are authors
    SubscribedTo,
    /// Key is the author, targets are subscribers
    Subscribers,
}

impl Direction {
    /// `(key, target)` of a join row for this direction
    pub fn split(self, row: &Subscription) -> (Uuid, Uuid) {
        match self {
            Self::SubscribedTo => (row.subscriber_id, row.author_id),
            Self::Subscribers => (row.author_id, row.subscriber_id),
        }
    }

    /// Group target ids per key and collect the distinct targets
    ///
    /// Both outputs keep the order of `rows`.
    pub fn group(self, rows: &[Subscription]) -> (HashMap<Uuid, Vec<Uuid>>, Vec<Uuid>) {
        let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for row in rows {
            let (key, target) = self.split(row);
            grouped.entry(key).or_default().push(target);
            if seen.insert(target) {
                targets.push(target);
            }
        }
        (grouped, targets)
    }
}

/// Look up every id in `index`, or `None` if any of them is missing
pub fn resolve_all(ids: &[Uuid], index: &HashMap<Uuid, User>) -> Option<Vec<User>> {
    ids.iter().map(|id| index.get(id).cloned()).collect()
}

/// Batch function for one direction of the subscription relation
#[derive(Clone)]
pub struct SubscriptionLoader {
    store: DynStore,
    direction: Direction,
}

impl SubscriptionLoader {
    /// Authors each subscriber follows
    pub fn user_subscribed_to(store: DynStore) -> Self {
        Self {
            store,
            direction: Direction::SubscribedTo,
        }
    }

    /// Subscribers of each author
    pub fn subscribed_to_user(store: DynStore) -> Self {
        Self {
            store,
            direction: Direction::Subscribers,
        }
    }

    async fn join_rows(&self, keys: &[Uuid]) -> Result<Vec<Subscription>, ApiError> {
        match self.direction {
            Direction::SubscribedTo => self.store.find_subscriptions_by_subscriber_ids(keys).await,
            Direction::Subscribers => self.store.find_subscriptions_by_author_ids(keys).await,
        }
    }
}

impl BatchFn<Uuid> for SubscriptionLoader {
    type Value = Vec<User>;
    type Error = ApiError;

    fn name(&self) -> &'static str {
        match self.direction {
            Direction::SubscribedTo => "user_subscribed_to",
            Direction::Subscribers => "subscribed_to_user",
        }
    }

    async fn fetch(&self, keys: &[Uuid]) -> Result<HashMap<Uuid, Self::Value>, Self::Error> {
        let rows = self.join_rows(keys).await?;
        let (grouped, targets) = self.direction.group(&rows);
        if targets.is_empty() {
            return Ok(HashMap::new());
        }

        let index: HashMap<Uuid, User> = self
            .store
            .find_users_by_ids(&targets)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        // Targets deleted between the two phases are dropped
        Ok(grouped
            .into_iter()
            .map(|(key, ids)| {
                let users = ids.iter().filter_map(|id| index.get(id).cloned()).collect();
                (key, users)
            })
            .collect())
    }
}
