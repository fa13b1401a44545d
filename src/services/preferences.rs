use chrono::{DateTime, Duration, Utc};

use crate::{
    config::PreferenceSettings,
    db::BookStore,
    error::AppResult,
    models::{BookProfile, SearchEntry, UserAffinity, UserId},
    services::taxonomy::Taxonomy,
};

/// What a user has shown interest in, as input to recommendation scoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub affinity: UserAffinity,
    /// Recent search queries, most recent first, duplicates kept
    pub keywords: Vec<String>,
}

/// Unions the genres and authors of the given (highly rated) books
///
/// Every category of a book is resolved on its own, so a book filed under
/// several paths can contribute several genres.
pub fn affinity_from_liked_books(taxonomy: &Taxonomy, liked: &[BookProfile]) -> UserAffinity {
    let mut affinity = UserAffinity::new();
    for book in liked {
        for genre in taxonomy.resolve_all(book.raw_categories()) {
            affinity.add_genre(genre);
        }
        for author in &book.authors {
            affinity.add_author(author.as_str());
        }
    }
    affinity
}

/// Queries issued within `window_days` before `now`, newest first, at most `cap`
pub fn recent_keywords(
    history: &[SearchEntry],
    now: DateTime<Utc>,
    window_days: i64,
    cap: usize,
) -> Vec<String> {
    let cutoff = now - Duration::days(window_days);
    let mut recent: Vec<&SearchEntry> = history
        .iter()
        .filter(|entry| entry.created_at >= cutoff)
        .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    recent
        .into_iter()
        .take(cap)
        .map(|entry| entry.query.clone())
        .collect()
}

/// Loads a user's liked books and search history and derives their preferences
pub async fn extract_preferences(
    store: &dyn BookStore,
    taxonomy: &Taxonomy,
    settings: &PreferenceSettings,
    user_id: UserId,
    now: DateTime<Utc>,
) -> AppResult<Preferences> {
    let liked = store
        .liked_books(user_id, settings.high_rating_threshold)
        .await?;
    let affinity = affinity_from_liked_books(taxonomy, &liked);

    let since = now - Duration::days(settings.search_window_days);
    let history = store
        .search_history(user_id, since, settings.search_history_limit)
        .await?;
    let keywords = recent_keywords(
        &history,
        now,
        settings.search_window_days,
        settings.search_history_limit,
    );

    tracing::debug!(
        user_id,
        liked_books = liked.len(),
        genres = affinity.genres.len(),
        authors = affinity.authors.len(),
        keywords = keywords.len(),
        "Preferences extracted"
    );

    Ok(Preferences { affinity, keywords })
}
