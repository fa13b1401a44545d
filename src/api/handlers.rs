use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Genre, GenreGroup, Page, ScoredBook, UserId},
    services::{
        recommendations,
        stats::{self, TasteOverview, UserStats},
        taxonomy::MatchTier,
    },
};

use super::AppState;

const DEFAULT_PAGE_LIMIT: i64 = 20;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct GenreListing {
    pub top_level: Vec<Genre>,
    pub sub_level: Vec<Genre>,
    pub groups: Vec<GenreGroup>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub category: String,
    pub genre: Option<Genre>,
    pub tier: Option<MatchTier>,
    pub leaf: Option<String>,
}

/// Raw paging parameters; out-of-range values are clamped, not rejected
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    fn to_page(&self) -> Page {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1);
        let offset = self.offset.unwrap_or(0).max(0);
        Page::new(
            usize::try_from(limit).unwrap_or(usize::MAX),
            usize::try_from(offset).unwrap_or(usize::MAX),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub items: Vec<ScoredBook>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Lists the canonical genres and display groups
pub async fn list_genres(State(state): State<AppState>) -> Json<GenreListing> {
    Json(GenreListing {
        top_level: state.taxonomy.top_level().to_vec(),
        sub_level: state.taxonomy.sub_level().to_vec(),
        groups: state.taxonomy.groups().to_vec(),
    })
}

/// Resolves one raw category string
pub async fn resolve_genre(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> AppResult<Json<ResolveResponse>> {
    let category = params
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("category must not be blank".to_string()))?;

    let resolution = state.taxonomy.resolve(&category);
    let leaf = state.taxonomy.leaf_tag(&category);

    Ok(Json(ResolveResponse {
        genre: resolution.as_ref().map(|r| r.genre),
        tier: resolution.map(|r| r.tier),
        leaf,
        category,
    }))
}

pub async fn user_stats(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<UserStats>> {
    tracing::info!(request_id = %request_id, user_id, "Computing user stats");

    let stats = stats::user_stats(state.store.as_ref(), &state.taxonomy, user_id).await?;
    Ok(Json(stats))
}

pub async fn taste_overview(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<TasteOverview>> {
    tracing::info!(request_id = %request_id, user_id, "Computing taste overview");

    let overview = stats::taste_overview(state.store.as_ref(), &state.taxonomy, user_id).await?;
    Ok(Json(overview))
}

/// Personalized, diversity-capped recommendations for a user
pub async fn user_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let page = params.to_page();
    tracing::info!(
        request_id = %request_id,
        user_id,
        limit = page.limit,
        offset = page.offset,
        "Processing recommendation request"
    );

    let items = recommendations::get_recommendations(
        state.store.as_ref(),
        &state.taxonomy,
        &state.preferences,
        &state.recommendations,
        user_id,
        page,
        Utc::now(),
    )
    .await?;

    Ok(Json(RecommendationsResponse { items }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults_and_clamping() {
        let page = |limit, offset| PageParams { limit, offset }.to_page();

        assert_eq!(page(None, None), Page::new(20, 0));
        assert_eq!(page(Some(0), Some(-5)), Page::new(1, 0));
        assert_eq!(page(Some(500), Some(3)), Page::new(500, 3));
    }
}
