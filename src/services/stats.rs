use serde::{Deserialize, Serialize};

use crate::{
    db::BookStore,
    error::AppResult,
    models::{
        FavoriteTag, Genre, GenreStat, LadderOrder, RatedBook, RatingBucket, RatingSummary,
        ReadingTime, UserId,
    },
    services::{aggregation, taxonomy::Taxonomy},
};

/// Full statistics page of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    pub rating_distribution: Vec<RatingBucket>,
    pub rating_summary: RatingSummary,
    pub reading_time: ReadingTime,
    pub top_level_genres: Vec<GenreStat>,
    /// Sub genres plus their display groups
    pub sub_genres: Vec<GenreStat>,
}

/// Condensed taste profile shown on the profile screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TasteOverview {
    /// Every review, rated or not
    pub total_reviews: u32,
    pub rating_distribution: Vec<RatingBucket>,
    pub favorite_tags: Vec<FavoriteTag>,
}

/// One `(genre, rating)` record per distinct genre of each rated book
///
/// A book filed under several categories that resolve to the same genre
/// still counts once for that genre. Books without a usable rating or
/// without any resolvable category contribute nothing.
pub fn genre_records(taxonomy: &Taxonomy, rated: &[RatedBook]) -> Vec<(Option<Genre>, f64)> {
    rated
        .iter()
        .filter_map(|book| {
            book.rating
                .filter(|r| r.is_finite())
                .map(|rating| (book, rating))
        })
        .flat_map(|(book, rating)| {
            taxonomy
                .resolve_all(book.raw_categories())
                .into_iter()
                .map(move |genre| (Some(genre), rating))
        })
        .collect()
}

pub async fn user_stats(
    store: &dyn BookStore,
    taxonomy: &Taxonomy,
    user_id: UserId,
) -> AppResult<UserStats> {
    let rated = store.rated_books(user_id).await?;
    let comments = store.comment_count(user_id).await?;
    let sessions = store.reading_sessions(user_id).await?;

    let ratings: Vec<Option<f64>> = rated.iter().map(|b| b.rating).collect();
    let records = genre_records(taxonomy, &rated);

    let stats = UserStats {
        rating_distribution: aggregation::rating_distribution(
            ratings.iter().copied(),
            LadderOrder::Ascending,
        ),
        rating_summary: aggregation::rating_summary(&ratings, comments),
        reading_time: aggregation::reading_time(&sessions),
        top_level_genres: aggregation::aggregate(&records, taxonomy.top_level()),
        sub_genres: aggregation::aggregate_with_groups(
            &records,
            taxonomy.sub_level(),
            taxonomy.groups(),
        ),
    };

    tracing::info!(
        user_id,
        reviews = rated.len(),
        genre_records = records.len(),
        sessions = sessions.len(),
        "User stats computed"
    );

    Ok(stats)
}

pub async fn taste_overview(
    store: &dyn BookStore,
    taxonomy: &Taxonomy,
    user_id: UserId,
) -> AppResult<TasteOverview> {
    let rated = store.rated_books(user_id).await?;

    Ok(TasteOverview {
        total_reviews: rated.len() as u32,
        rating_distribution: aggregation::rating_distribution(
            rated.iter().map(|b| b.rating),
            LadderOrder::Descending,
        ),
        favorite_tags: aggregation::favorite_tags(
            taxonomy,
            rated.iter().filter_map(|b| b.category.as_deref()),
        ),
    })
}
