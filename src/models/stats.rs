use serde::{Deserialize, Serialize};

/// Aggregated rating statistics for one genre or genre group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenreStat {
    pub name: String,
    pub review_count: u32,
    /// Mean rating on the 0.5–5.0 scale, rounded to two decimals
    pub average_5: f64,
    /// `average_5` rescaled to 0–100
    pub average_100: u32,
}

impl GenreStat {
    /// Entry for a genre nobody has rated yet
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            review_count: 0,
            average_5: 0.0,
            average_100: 0,
        }
    }
}

/// One step of the 0.5–5.0 rating ladder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingBucket {
    pub rating: f64,
    pub count: u32,
}

/// Direction in which rating buckets are listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LadderOrder {
    /// 0.5 first, used by the statistics view
    Ascending,
    /// 5.0 first, used by the taste overview
    Descending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingSummary {
    pub average_5: f64,
    pub average_100: u32,
    pub total_reviews: u32,
    pub most_frequent_rating: Option<f64>,
    pub total_comments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingTime {
    pub total_seconds: i64,
    pub human: String,
}

/// A category leaf the user has rated, with how often it occurred
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteTag {
    pub tag: String,
    pub count: u32,
}
