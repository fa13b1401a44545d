use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // Outside the trace layer so the span sees the request ID
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Taxonomy
        .route("/genres", get(handlers::list_genres))
        .route("/genres/resolve", get(handlers::resolve_genre))
        // Per-user views
        .route("/users/:user_id/stats", get(handlers::user_stats))
        .route("/users/:user_id/taste", get(handlers::taste_overview))
        .route(
            "/users/:user_id/recommendations",
            get(handlers::user_recommendations),
        )
}
