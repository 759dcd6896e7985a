//! Post repository for centralized database operations

use sqlx::PgPool;
use uuid::Uuid;

use super::utils::POST_COLUMNS;
use crate::models::{CreatePost, Post, UpdatePost};

/// Repository for post database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new PostRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch every post in table order
    pub async fn find_all(&self) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!("SELECT {} FROM posts", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await
    }

    /// Fetch posts by id
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!("SELECT {} FROM posts WHERE id = ANY($1)", POST_COLUMNS);
        sqlx::query_as::<_, Post>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetch all posts written by any of `author_ids`
    pub async fn find_by_author_ids(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM posts WHERE author_id = ANY($1)",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(author_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Insert a new post
    pub async fn create(&self, id: Uuid, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let sql = format!(
            r#"INSERT INTO posts (id, title, content, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}"#,
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Update the set fields of a post
    pub async fn update(&self, id: Uuid, input: &UpdatePost) -> Result<Option<Post>, sqlx::Error> {
        let sql = format!(
            r#"UPDATE posts
            SET title = COALESCE($2, title), content = COALESCE($3, content)
            WHERE id = $1
            RETURNING {}"#,
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.content.as_deref())
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a post
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
