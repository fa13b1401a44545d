use chrono::{DateTime, Utc};

use crate::{
    db::BookStore,
    error::AppResult,
    models::{
        BookId, BookProfile, ExclusionSet, RatedBook, ReadingSession, SearchEntry, UserId,
    },
};

#[derive(Debug, Clone)]
struct Review {
    user_id: UserId,
    book_id: BookId,
    rating: Option<f64>,
}

/// Store backed by plain vectors, assembled up front with the `with_*` builders
///
/// Used by the API tests and for running the service without a database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    books: Vec<BookProfile>,
    reviews: Vec<Review>,
    comments: Vec<UserId>,
    searches: Vec<(UserId, SearchEntry)>,
    library: Vec<(UserId, BookId)>,
    wishlist: Vec<(UserId, BookId)>,
    sessions: Vec<(UserId, ReadingSession)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, book: BookProfile) -> Self {
        self.books.push(book);
        self
    }

    pub fn with_review(mut self, user_id: UserId, book_id: BookId, rating: Option<f64>) -> Self {
        self.reviews.push(Review {
            user_id,
            book_id,
            rating,
        });
        self
    }

    /// Records `count` comments on the user's reviews
    pub fn with_comments(mut self, user_id: UserId, count: usize) -> Self {
        self.comments.extend(std::iter::repeat(user_id).take(count));
        self
    }

    pub fn with_search(
        mut self,
        user_id: UserId,
        query: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.searches.push((
            user_id,
            SearchEntry {
                query: query.into(),
                created_at,
            },
        ));
        self
    }

    pub fn with_library_entry(mut self, user_id: UserId, book_id: BookId) -> Self {
        self.library.push((user_id, book_id));
        self
    }

    pub fn with_wishlist_entry(mut self, user_id: UserId, book_id: BookId) -> Self {
        self.wishlist.push((user_id, book_id));
        self
    }

    pub fn with_session(mut self, user_id: UserId, session: ReadingSession) -> Self {
        self.sessions.push((user_id, session));
        self
    }

    fn book(&self, book_id: BookId) -> Option<&BookProfile> {
        self.books.iter().find(|b| b.id == book_id)
    }

    fn reviews_of(&self, user_id: UserId) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(move |r| r.user_id == user_id)
    }
}

#[async_trait::async_trait]
impl BookStore for InMemoryStore {
    async fn rated_books(&self, user_id: UserId) -> AppResult<Vec<RatedBook>> {
        Ok(self
            .reviews_of(user_id)
            .filter_map(|review| {
                self.book(review.book_id).map(|book| RatedBook {
                    book_id: book.id,
                    rating: review.rating,
                    category: book.category.clone(),
                    category_tags: book.category_tags.clone(),
                })
            })
            .collect())
    }

    async fn liked_books(&self, user_id: UserId, min_rating: f64) -> AppResult<Vec<BookProfile>> {
        Ok(self
            .reviews_of(user_id)
            .filter(|review| review.rating.is_some_and(|r| r >= min_rating))
            .filter_map(|review| self.book(review.book_id).cloned())
            .collect())
    }

    async fn search_history(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
        limit: usize,
    ) -> AppResult<Vec<SearchEntry>> {
        // Insertion order stands in for the auto-increment id
        Ok(self
            .searches
            .iter()
            .rev()
            .filter(|(uid, entry)| *uid == user_id && entry.created_at >= since)
            .map(|(_, entry)| entry.clone())
            .take(limit)
            .collect())
    }

    async fn category_tags(&self) -> AppResult<Vec<(BookId, String)>> {
        Ok(self
            .books
            .iter()
            .flat_map(|book| book.category_tags.iter().map(|tag| (book.id, tag.clone())))
            .collect())
    }

    async fn books_by_ids(&self, ids: &[BookId], limit: usize) -> AppResult<Vec<BookProfile>> {
        Ok(self
            .books
            .iter()
            .filter(|book| ids.contains(&book.id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn books(&self, limit: usize) -> AppResult<Vec<BookProfile>> {
        Ok(self.books.iter().take(limit).cloned().collect())
    }

    async fn exclusions(&self, user_id: UserId) -> AppResult<ExclusionSet> {
        let of_user = |rows: &[(UserId, BookId)]| {
            rows.iter()
                .filter(|(uid, _)| *uid == user_id)
                .map(|(_, book_id)| *book_id)
                .collect()
        };

        Ok(ExclusionSet {
            library: of_user(&self.library),
            reviewed: self.reviews_of(user_id).map(|r| r.book_id).collect(),
            wishlisted: of_user(&self.wishlist),
        })
    }

    async fn comment_count(&self, user_id: UserId) -> AppResult<u32> {
        Ok(self.comments.iter().filter(|uid| **uid == user_id).count() as u32)
    }

    async fn reading_sessions(&self, user_id: UserId) -> AppResult<Vec<ReadingSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, session)| session.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> InMemoryStore {
        InMemoryStore::new()
            .with_book(BookProfile::new(1, "Dune").with_tag("SF").with_author("Frank Herbert"))
            .with_book(BookProfile::new(2, "Emma").with_category("Romance"))
            .with_review(7, 1, Some(4.5))
            .with_review(7, 2, Some(3.0))
            .with_review(8, 2, None)
            .with_wishlist_entry(7, 3)
    }

    #[test]
    fn test_liked_books_applies_threshold() {
        let liked = tokio_test::block_on(store().liked_books(7, 4.0)).unwrap();
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].title, "Dune");
    }

    #[test]
    fn test_rated_books_carry_categories() {
        let rated = tokio_test::block_on(store().rated_books(7)).unwrap();
        assert_eq!(rated.len(), 2);
        assert_eq!(rated[0].category_tags, vec!["SF".to_string()]);
        assert_eq!(rated[1].category.as_deref(), Some("Romance"));
    }

    #[test]
    fn test_exclusions_merge_reviews_and_wishlist() {
        let exclusions = tokio_test::block_on(store().exclusions(7)).unwrap();
        assert!(exclusions.contains(1));
        assert!(exclusions.contains(2));
        assert!(exclusions.contains(3));
        assert!(!tokio_test::block_on(store().exclusions(9)).unwrap().contains(1));
    }

    #[test]
    fn test_search_history_is_recent_first_and_limited() {
        let now = Utc::now();
        let store = InMemoryStore::new()
            .with_search(7, "old", now - Duration::days(40))
            .with_search(7, "first", now - Duration::days(2))
            .with_search(8, "other user", now)
            .with_search(7, "second", now - Duration::days(1));

        let since = now - Duration::days(30);
        let history = tokio_test::block_on(store.search_history(7, since, 10)).unwrap();
        let queries: Vec<&str> = history.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["second", "first"]);

        let limited = tokio_test::block_on(store.search_history(7, since, 1)).unwrap();
        assert_eq!(limited.len(), 1);
    }
}
