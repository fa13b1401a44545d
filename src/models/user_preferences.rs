use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::{BookId, Genre};

/// Genres and authors a user has shown a liking for
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserAffinity {
    /// Genres of highly rated books
    pub genres: BTreeSet<Genre>,
    /// Authors of highly rated books
    pub authors: BTreeSet<String>,
}

impl UserAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_genre(&mut self, genre: Genre) {
        self.genres.insert(genre);
    }

    pub fn add_author(&mut self, author: impl Into<String>) {
        self.authors.insert(author.into());
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.authors.is_empty()
    }

    /// Whether any of the given genres is preferred
    pub fn likes_any_genre<'a>(&self, genres: impl IntoIterator<Item = &'a Genre>) -> bool {
        genres.into_iter().any(|g| self.genres.contains(g))
    }

    /// Whether any of the given authors is preferred
    pub fn likes_any_author<'a>(&self, authors: impl IntoIterator<Item = &'a String>) -> bool {
        authors.into_iter().any(|a| self.authors.contains(a))
    }
}

/// Books a user already has a relationship with
///
/// A book in any of the three sets is never recommended.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExclusionSet {
    /// Books with any reading-status record
    pub library: HashSet<BookId>,
    pub reviewed: HashSet<BookId>,
    pub wishlisted: HashSet<BookId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, book_id: BookId) -> bool {
        self.library.contains(&book_id)
            || self.reviewed.contains(&book_id)
            || self.wishlisted.contains(&book_id)
    }

    pub fn len(&self) -> usize {
        self.library
            .iter()
            .chain(self.reviewed.iter())
            .chain(self.wishlisted.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
