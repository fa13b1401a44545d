use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{
        BookId, BookProfile, ExclusionSet, RatedBook, ReadingSession, SearchEntry, UserId,
    },
};

/// Read access to the rows the statistics and recommendation services need
///
/// Implementations do all I/O up front; the services then work on the
/// returned collections without touching storage again.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// Every review of the user, with the reviewed book's categories
    async fn rated_books(&self, user_id: UserId) -> AppResult<Vec<RatedBook>>;

    /// Books the user reviewed with a rating of at least `min_rating`
    async fn liked_books(&self, user_id: UserId, min_rating: f64) -> AppResult<Vec<BookProfile>>;

    /// Search queries issued at or after `since`, most recent first
    async fn search_history(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<SearchEntry>>;

    /// All `(book id, category tag)` rows of the catalog
    async fn category_tags(&self) -> AppResult<Vec<(BookId, String)>>;

    /// Books with the given ids, at most `limit` of them
    async fn books_by_ids(&self, ids: &[BookId], limit: usize) -> AppResult<Vec<BookProfile>>;

    /// The first `limit` books of the catalog
    async fn books(&self, limit: usize) -> AppResult<Vec<BookProfile>>;

    /// Books in the user's library, reviewed, or wishlisted
    async fn exclusions(&self, user_id: UserId) -> AppResult<ExclusionSet>;

    /// Number of comments left on the user's reviews
    async fn comment_count(&self, user_id: UserId) -> AppResult<u32>;

    async fn reading_sessions(&self, user_id: UserId) -> AppResult<Vec<ReadingSession>>;
}
