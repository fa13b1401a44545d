use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::collections::HashSet;

use crate::{
    db::BookStore,
    error::AppResult,
    models::{
        BookId, BookProfile, ExclusionSet, RatedBook, ReadingSession, SearchEntry, UserId,
    },
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Category tags of `b`, as a text array
const CATEGORY_TAGS: &str = r#"
    ARRAY(
        SELECT bc.category_name FROM book_categories bc
        WHERE bc.book_id = b.id
        ORDER BY bc.category_name
    )::TEXT[]
"#;

/// Author names of `b`, as a text array
const AUTHOR_NAMES: &str = r#"
    ARRAY(
        SELECT a.name FROM book_authors ba
        JOIN authors a ON a.id = ba.author_id
        WHERE ba.book_id = b.id
        ORDER BY a.name
    )::TEXT[]
"#;

fn book_columns() -> String {
    format!(
        "b.id::BIGINT AS id, b.title, b.publisher, b.category, \
         {CATEGORY_TAGS} AS category_tags, {AUTHOR_NAMES} AS authors"
    )
}

/// [`BookStore`] over the application's Postgres schema
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn book_ids(&self, sql: &str, user_id: UserId) -> AppResult<HashSet<BookId>> {
        let ids: Vec<BookId> = sqlx::query_scalar(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}

#[async_trait::async_trait]
impl BookStore for PgBookStore {
    async fn rated_books(&self, user_id: UserId) -> AppResult<Vec<RatedBook>> {
        let sql = format!(
            "SELECT r.book_id::BIGINT AS book_id, r.rating, b.category, \
             {CATEGORY_TAGS} AS category_tags \
             FROM reviews r JOIN books b ON b.id = r.book_id \
             WHERE r.user_id = $1 \
             ORDER BY r.id"
        );

        let rows = sqlx::query_as::<_, RatedBook>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(user_id, rows = rows.len(), "Fetched rated books");
        Ok(rows)
    }

    async fn liked_books(&self, user_id: UserId, min_rating: f64) -> AppResult<Vec<BookProfile>> {
        let sql = format!(
            "SELECT {} \
             FROM reviews r JOIN books b ON b.id = r.book_id \
             WHERE r.user_id = $1 AND r.rating IS NOT NULL AND r.rating >= $2 \
             ORDER BY r.id",
            book_columns()
        );

        let rows = sqlx::query_as::<_, BookProfile>(&sql)
            .bind(user_id)
            .bind(min_rating)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(user_id, rows = rows.len(), "Fetched liked books");
        Ok(rows)
    }

    async fn search_history(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<SearchEntry>> {
        let rows = sqlx::query_as::<_, SearchEntry>(
            r#"
            SELECT query, created_at AT TIME ZONE 'UTC' AS created_at
            FROM search_history
            WHERE user_id = $1 AND (created_at AT TIME ZONE 'UTC') >= $2
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(since)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn category_tags(&self) -> AppResult<Vec<(BookId, String)>> {
        let rows = sqlx::query_as::<_, (BookId, String)>(
            "SELECT book_id::BIGINT, category_name::TEXT FROM book_categories ORDER BY book_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn books_by_ids(&self, ids: &[BookId], limit: usize) -> AppResult<Vec<BookProfile>> {
        let sql = format!(
            "SELECT {} FROM books b WHERE b.id::BIGINT = ANY($1) ORDER BY b.id LIMIT $2",
            book_columns()
        );

        let rows = sqlx::query_as::<_, BookProfile>(&sql)
            .bind(ids)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn books(&self, limit: usize) -> AppResult<Vec<BookProfile>> {
        let sql = format!(
            "SELECT {} FROM books b ORDER BY b.id LIMIT $1",
            book_columns()
        );

        let rows = sqlx::query_as::<_, BookProfile>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn exclusions(&self, user_id: UserId) -> AppResult<ExclusionSet> {
        let library = self
            .book_ids("SELECT book_id::BIGINT FROM user_books WHERE user_id = $1", user_id)
            .await?;
        let reviewed = self
            .book_ids("SELECT book_id::BIGINT FROM reviews WHERE user_id = $1", user_id)
            .await?;
        let wishlisted = self
            .book_ids("SELECT book_id::BIGINT FROM wishlist WHERE user_id = $1", user_id)
            .await?;

        Ok(ExclusionSet {
            library,
            reviewed,
            wishlisted,
        })
    }

    async fn comment_count(&self, user_id: UserId) -> AppResult<u32> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM review_comments rc
            JOIN reviews r ON rc.review_id = r.id
            WHERE r.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn reading_sessions(&self, user_id: UserId) -> AppResult<Vec<ReadingSession>> {
        let rows = sqlx::query_as::<_, ReadingSession>(
            r#"
            SELECT start_time AT TIME ZONE 'UTC' AS start_time,
                   end_time AT TIME ZONE 'UTC' AS end_time,
                   total_seconds::BIGINT AS total_seconds
            FROM reading_sessions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
