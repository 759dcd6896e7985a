//! Subscription repository for the subscribers_on_authors join table

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::SUBSCRIPTION_COLUMNS;
use crate::models::Subscription;

/// Repository for subscription join rows
#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new SubscriptionRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Join rows whose subscriber is in `subscriber_ids`
    pub async fn find_by_subscriber_ids(
        &self,
        subscriber_ids: &[Uuid],
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM subscribers_on_authors WHERE subscriber_id = ANY($1)",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(subscriber_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Join rows whose author is in `author_ids`
    pub async fn find_by_author_ids(
        &self,
        author_ids: &[Uuid],
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM subscribers_on_authors WHERE author_id = ANY($1)",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Join rows with either side in `user_ids`
    pub async fn find_touching(&self, user_ids: &[Uuid]) -> Result<Vec<Subscription>, sqlx::Error> {
        let sql = format!(
            r#"SELECT {} FROM subscribers_on_authors
            WHERE subscriber_id = ANY($1) OR author_id = ANY($1)"#,
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, Subscription>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Insert a join row
    pub async fn create(&self, subscription: Subscription) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO subscribers_on_authors (subscriber_id, author_id) VALUES ($1, $2)")
            .bind(subscription.subscriber_id)
            .bind(subscription.author_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a join row, reporting whether one existed
    pub async fn delete(&self, subscription: Subscription) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM subscribers_on_authors WHERE subscriber_id = $1 AND author_id = $2",
        )
        .bind(subscription.subscriber_id)
        .bind(subscription.author_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
