use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};

use crate::{
    config::{DiversityStrategy, PreferenceSettings, RecommendationSettings},
    db::BookStore,
    error::AppResult,
    models::{BookId, BookProfile, ExclusionSet, Genre, Page, ScoredBook, UserAffinity, UserId},
    services::{
        diversity::{self, Candidate, DiversityCaps},
        preferences,
        taxonomy::Taxonomy,
    },
};

const GENRE_WEIGHT: f64 = 1.0;
const AUTHOR_WEIGHT: f64 = 0.8;
const KEYWORD_WEIGHT: f64 = 0.7;

/// Books with at least one category tag resolving into `genres`, in tag order
pub fn matching_book_ids(
    taxonomy: &Taxonomy,
    tags: &[(BookId, String)],
    genres: &BTreeSet<Genre>,
) -> Vec<BookId> {
    let mut seen = HashSet::new();
    tags.iter()
        .filter(|(_, tag)| {
            taxonomy
                .resolve_genre(Some(tag.as_str()))
                .is_some_and(|genre| genres.contains(&genre))
        })
        .filter_map(|(book_id, _)| seen.insert(*book_id).then_some(*book_id))
        .collect()
}

/// Whether any non-blank keyword occurs in the title, publisher or category
fn matches_keyword(book: &BookProfile, keywords: &[String]) -> bool {
    let title = book.title.to_lowercase();
    let publisher = book.publisher.as_deref().unwrap_or_default().to_lowercase();
    let category = book.category.as_deref().unwrap_or_default().to_lowercase();

    // Surrounding whitespace is part of the keyword
    keywords
        .iter()
        .filter(|kw| !kw.trim().is_empty())
        .map(|kw| kw.to_lowercase())
        .any(|kw| title.contains(&kw) || publisher.contains(&kw) || category.contains(&kw))
}

/// Additive relevance of a book; each signal counts at most once
pub fn score_book(
    book: &BookProfile,
    book_genres: &BTreeSet<Genre>,
    affinity: &UserAffinity,
    keywords: &[String],
) -> f64 {
    let mut score = 0.0;
    if affinity.likes_any_genre(book_genres) {
        score += GENRE_WEIGHT;
    }
    if affinity.likes_any_author(&book.authors) {
        score += AUTHOR_WEIGHT;
    }
    if matches_keyword(book, keywords) {
        score += KEYWORD_WEIGHT;
    }
    score
}

/// Scores, ranks, diversifies and pages the candidate pool
///
/// Excluded and zero-score books are dropped. Ranking is by score, highest
/// first, keeping pool order between equal scores. The diversity caps apply
/// to one page-independent list, and paging slices it last.
pub fn score_and_rank(
    taxonomy: &Taxonomy,
    candidates: &[BookProfile],
    affinity: &UserAffinity,
    keywords: &[String],
    exclusions: &ExclusionSet,
    page: Page,
    settings: &RecommendationSettings,
) -> Vec<ScoredBook> {
    let page = page.clamped(settings.max_page_limit);

    let mut ranked: Vec<Candidate> = candidates
        .iter()
        .filter(|book| !exclusions.contains(book.id))
        .filter_map(|book| {
            let book_genres = taxonomy.resolve_all(book.raw_categories());
            let score = score_book(book, &book_genres, affinity, keywords);
            (score > 0.0).then(|| Candidate {
                book_id: book.id,
                score,
                authors: &book.authors,
                // The cap counts the primary category only
                genres: taxonomy.resolve_genre(book.category.as_deref()).into_iter().collect(),
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let caps = DiversityCaps {
        author: settings.author_cap,
        genre: settings.genre_cap,
    };
    // Greedy picks form a stable prefix. The optimum does not, so it covers the
    // whole pool and every page slices that one list.
    let wanted = match settings.strategy {
        DiversityStrategy::Greedy => page.end(),
        DiversityStrategy::Optimal => ranked.len(),
    };
    let selected = diversity::select(&ranked, caps, wanted, settings.strategy);

    tracing::debug!(
        pool = candidates.len(),
        scored = ranked.len(),
        selected = selected.len(),
        "Recommendations ranked"
    );

    let diversified: Vec<ScoredBook> = selected
        .into_iter()
        .map(|index| ScoredBook {
            book_id: ranked[index].book_id,
            score: ranked[index].score,
        })
        .collect();
    page.apply(diversified)
}

/// Books worth scoring for a user with the given genre preferences
///
/// Restricted to books tagged with a preferred genre when there are any;
/// otherwise, or when nothing matches, the start of the catalog.
pub async fn candidate_pool(
    store: &dyn BookStore,
    taxonomy: &Taxonomy,
    genres: &BTreeSet<Genre>,
    pool_size: usize,
) -> AppResult<Vec<BookProfile>> {
    if !genres.is_empty() {
        let tags = store.category_tags().await?;
        let ids = matching_book_ids(taxonomy, &tags, genres);
        if !ids.is_empty() {
            return store.books_by_ids(&ids, pool_size).await;
        }
        tracing::debug!("No book matches the preferred genres, using the catalog");
    }

    store.books(pool_size).await
}

/// Personalized recommendations for one user
pub async fn get_recommendations(
    store: &dyn BookStore,
    taxonomy: &Taxonomy,
    preference_settings: &PreferenceSettings,
    settings: &RecommendationSettings,
    user_id: UserId,
    page: Page,
    now: DateTime<Utc>,
) -> AppResult<Vec<ScoredBook>> {
    let prefs =
        preferences::extract_preferences(store, taxonomy, preference_settings, user_id, now).await?;
    let pool = candidate_pool(
        store,
        taxonomy,
        &prefs.affinity.genres,
        settings.candidate_pool_size,
    )
    .await?;
    let exclusions = store.exclusions(user_id).await?;

    let items = score_and_rank(
        taxonomy,
        &pool,
        &prefs.affinity,
        &prefs.keywords,
        &exclusions,
        page,
        settings,
    );

    tracing::info!(
        user_id,
        pool = pool.len(),
        excluded = exclusions.len(),
        returned = items.len(),
        "Recommendations generated"
    );

    Ok(items)
}
