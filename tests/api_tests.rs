use std::sync::Arc;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::Value;

use bookstopper_api::{
    api::{create_router, AppState},
    db::InMemoryStore,
    models::{BookProfile, ReadingSession},
    services::Taxonomy,
};

const READER: i64 = 1;
const NEW_USER: i64 = 99;

fn create_store() -> InMemoryStore {
    let mut store = InMemoryStore::new()
        .with_book(
            BookProfile::new(1, "Dune")
                .with_category("국내도서>소설>SF")
                .with_tag("국내도서>소설>영미소설")
                .with_author("Frank Herbert"),
        )
        .with_book(BookProfile::new(2, "Good to Great").with_category("국내도서>경제경영>경영"))
        .with_book(BookProfile::new(3, "산문집").with_category("국내도서>에세이"));

    // Five SF-tagged books by X, X, Y, Y, Z and two cookbooks
    for (id, author) in [(10, "X"), (11, "X"), (12, "Y"), (13, "Y"), (14, "Z")] {
        store = store.with_book(
            BookProfile::new(id, format!("우주 {id}"))
                .with_tag("국내도서>소설>SF")
                .with_author(author),
        );
    }
    for id in [15, 16] {
        store = store.with_book(
            BookProfile::new(id, format!("요리 {id}"))
                .with_category("국내도서>요리")
                .with_author("Chef"),
        );
    }

    store
        .with_review(READER, 1, Some(5.0))
        .with_review(READER, 2, Some(3.0))
        .with_review(READER, 3, None)
        .with_comments(READER, 2)
        .with_wishlist_entry(READER, 12)
        .with_search(READER, "은하", Utc::now() - Duration::days(1))
        .with_session(
            READER,
            ReadingSession {
                start_time: None,
                end_time: None,
                total_seconds: Some(5400),
            },
        )
}

fn create_test_server() -> TestServer {
    server_for(create_store())
}

fn server_for(store: InMemoryStore) -> TestServer {
    let state = AppState::new(Arc::new(store), Taxonomy::builtin());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn book_ids(body: &Value) -> Vec<i64> {
    body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["book_id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_genres() {
    let server = create_test_server();
    let response = server.get("/api/v1/genres").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["top_level"].as_array().unwrap().len(), 5);
    assert_eq!(body["top_level"][0], "소설");
    assert_eq!(body["sub_level"].as_array().unwrap().len(), 18);
    assert_eq!(body["groups"][0]["name"], "경제/경영");
    assert_eq!(body["groups"][0]["members"][0], "경제");
}

#[tokio::test]
async fn test_resolve_aladin_path() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/genres/resolve")
        .add_query_param("category", "국내도서>문학>소설>영미소설")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["genre"], "소설");
    assert_eq!(body["leaf"], "영미소설");
    assert_eq!(body["tier"], "exact");
}

#[tokio::test]
async fn test_resolve_rejects_missing_or_blank_category() {
    let server = create_test_server();

    let response = server.get("/api/v1/genres/resolve").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("category"));

    let response = server
        .get("/api/v1/genres/resolve")
        .add_query_param("category", "   ")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_unknown_category_is_not_an_error() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/genres/resolve")
        .add_query_param("category", "국내도서>요리")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["genre"].is_null());
    assert_eq!(body["leaf"], "요리");
}

#[tokio::test]
async fn test_user_stats() {
    let server = create_test_server();
    let response = server.get(&format!("/api/v1/users/{READER}/stats")).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let distribution = body["rating_distribution"].as_array().unwrap();
    assert_eq!(distribution.len(), 10);
    assert_eq!(distribution[0]["rating"], 0.5);
    assert_eq!(distribution[9]["count"], 1);

    assert_eq!(body["rating_summary"]["total_reviews"], 2);
    assert_eq!(body["rating_summary"]["average_5"], 4.0);
    assert_eq!(body["rating_summary"]["average_100"], 80);
    assert_eq!(body["rating_summary"]["total_comments"], 2);
    assert_eq!(body["reading_time"]["total_seconds"], 5400);

    let top = body["top_level_genres"].as_array().unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0]["name"], "소설");
    assert_eq!(top[0]["average_100"], 100);

    let sub = body["sub_genres"].as_array().unwrap();
    assert_eq!(sub.len(), 19);
    assert_eq!(sub[0]["name"], "SF");
}

#[tokio::test]
async fn test_user_stats_zero_filled_for_new_user() {
    let server = create_test_server();
    let response = server.get(&format!("/api/v1/users/{NEW_USER}/stats")).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["rating_distribution"]
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["count"] == 0));
    assert_eq!(body["top_level_genres"].as_array().unwrap().len(), 5);
    assert!(body["sub_genres"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["review_count"] == 0));
    assert_eq!(body["reading_time"]["human"], "0시간");
}

#[tokio::test]
async fn test_taste_overview_lists_highest_rating_first() {
    let server = create_test_server();
    let response = server.get(&format!("/api/v1/users/{READER}/taste")).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total_reviews"], 3);
    assert_eq!(body["rating_distribution"][0]["rating"], 5.0);
    assert_eq!(body["rating_distribution"][0]["count"], 1);
    assert_eq!(body["favorite_tags"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_recommendations_exclude_wishlist_and_respect_caps() {
    let server = create_test_server();
    let response = server
        .get(&format!("/api/v1/users/{READER}/recommendations"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(book_ids(&body), vec![10, 11, 13, 14]);
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["score"] == 1.0));
}

#[tokio::test]
async fn test_recommendations_paging() {
    let server = create_test_server();
    let path = format!("/api/v1/users/{READER}/recommendations");

    let response = server
        .get(&path)
        .add_query_param("limit", 2)
        .add_query_param("offset", 1)
        .await;
    assert_eq!(book_ids(&response.json()), vec![11, 13]);

    let response = server.get(&path).add_query_param("limit", 0).await;
    assert_eq!(book_ids(&response.json()), vec![10]);

    let response = server
        .get(&path)
        .add_query_param("limit", 1000)
        .add_query_param("offset", -3)
        .await;
    assert_eq!(book_ids(&response.json()), vec![10, 11, 13, 14]);
}

#[tokio::test]
async fn test_recommendations_exclude_library_books() {
    let server = server_for(create_store().with_library_entry(READER, 14));
    let response = server
        .get(&format!("/api/v1/users/{READER}/recommendations"))
        .await;
    response.assert_status_ok();

    assert_eq!(book_ids(&response.json()), vec![10, 11, 13]);
}

#[tokio::test]
async fn test_recommendations_empty_for_new_user() {
    let server = create_test_server();
    let response = server
        .get(&format!("/api/v1/users/{NEW_USER}/recommendations"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(book_ids(&body).is_empty());
}

#[tokio::test]
async fn test_request_id_header_propagated() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            "x-request-id".parse::<axum::http::HeaderName>().unwrap(),
            "client-trace-1".parse::<axum::http::HeaderValue>().unwrap(),
        )
        .await;

    assert_eq!(response.header("x-request-id"), "client-trace-1");
}
