use serde::{Deserialize, Serialize};

pub mod book;
pub mod genre;
pub mod stats;
pub mod user_preferences;

pub use book::{BookProfile, RatedBook, ReadingSession, SearchEntry};
pub use genre::{Genre, GenreGroup};
pub use stats::{FavoriteTag, GenreStat, LadderOrder, RatingBucket, RatingSummary, ReadingTime};
pub use user_preferences::{ExclusionSet, UserAffinity};

/// Primary key of the `books` table
pub type BookId = i64;

/// Primary key of the `users` table
pub type UserId = i64;

/// A recommendation candidate with its additive relevance score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredBook {
    pub book_id: BookId,
    pub score: f64,
}

/// Offset/limit window over a ranked list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Clamps the limit into `1..=max_limit`
    pub fn clamped(self, max_limit: usize) -> Self {
        Self {
            limit: self.limit.clamp(1, max_limit.max(1)),
            offset: self.offset,
        }
    }

    /// Number of ranked items needed to fill this page
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(0, 3).clamped(50), Page::new(1, 3));
        assert_eq!(Page::new(500, 0).clamped(50), Page::new(50, 0));
        assert_eq!(Page::new(20, 0).clamped(50), Page::new(20, 0));
    }

    #[test]
    fn test_page_apply_skips_and_takes() {
        let page = Page::new(2, 1);
        assert_eq!(page.apply(vec![1, 2, 3, 4]), vec![2, 3]);
        assert_eq!(page.end(), 3);
        assert!(Page::new(2, 10).apply(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn test_scored_book_serialization() {
        let scored = ScoredBook {
            book_id: 42,
            score: 1.8,
        };
        let json = serde_json::to_string(&scored).unwrap();
        assert_eq!(json, r#"{"book_id":42,"score":1.8}"#);
    }
}
