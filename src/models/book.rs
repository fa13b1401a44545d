use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookId;

/// Book as seen by classification and scoring
///
/// `category` is the free-text category column on the book itself, while
/// `category_tags` holds the separate per-book category rows. Both may be
/// hierarchical `>`-delimited paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct BookProfile {
    pub id: BookId,
    pub title: String,
    pub publisher: Option<String>,
    pub category: Option<String>,
    pub category_tags: Vec<String>,
    pub authors: Vec<String>,
}

impl BookProfile {
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            publisher: None,
            category: None,
            category_tags: Vec::new(),
            authors: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.category_tags.push(tag.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Every raw category string attached to the book, primary column first
    pub fn raw_categories(&self) -> impl Iterator<Item = &str> {
        self.category
            .as_deref()
            .into_iter()
            .chain(self.category_tags.iter().map(String::as_str))
    }
}

/// A review of the user together with the reviewed book's categories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct RatedBook {
    pub book_id: BookId,
    pub rating: Option<f64>,
    pub category: Option<String>,
    pub category_tags: Vec<String>,
}

impl RatedBook {
    pub fn raw_categories(&self) -> impl Iterator<Item = &str> {
        self.category
            .as_deref()
            .into_iter()
            .chain(self.category_tags.iter().map(String::as_str))
    }
}

/// One row of a user's search history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct SearchEntry {
    pub query: String,
    pub created_at: DateTime<Utc>,
}

/// One reading session; `total_seconds` wins over the timestamps when set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ReadingSession {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_seconds: Option<i64>,
}
