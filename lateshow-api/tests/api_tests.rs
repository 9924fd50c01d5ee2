//! Integration tests for lateshow-api endpoints
//!
//! Tests cover:
//! - Landing and health routes
//! - Episode listing, detail (nested appearances) and cascade delete
//! - Guest listing and detail
//! - Appearance creation pipeline and its error responses

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use lateshow_api::{build_router, AppState};
use lateshow_common::db;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: In-memory database with the sample data loaded
async fn setup_test_db() -> SqlitePool {
    let pool = db::connect_in_memory()
        .await
        .expect("Should open in-memory database");
    db::seed_database(&pool).await.expect("Should seed database");
    pool
}

fn setup_app(db: SqlitePool) -> Router {
    build_router(AppState::new(db))
}

fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/appearances")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Send one request and return status plus JSON body
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).expect("Should parse JSON");
    (status, body)
}

// =============================================================================
// Landing and health
// =============================================================================

#[tokio::test]
async fn test_home() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Welcome to the Late Show API"}));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "lateshow-api");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());
    pool.close().await;

    let (status, body) = send(&app, test_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unavailable");
}

// =============================================================================
// Episodes
// =============================================================================

#[tokio::test]
async fn test_list_episodes() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/episodes")).await;

    assert_eq!(status, StatusCode::OK);
    let episodes = body.as_array().unwrap();
    assert_eq!(episodes.len(), 10);
    assert_eq!(episodes[0], json!({"id": 1, "date": "2023-01-01", "number": 1}));
    // List entries carry leaf fields only
    assert!(episodes.iter().all(|e| e.get("appearances").is_none()));
}

#[tokio::test]
async fn test_get_episode_nests_guests() {
    let app = setup_app(setup_test_db().await);

    let (status, _) = send(&app, form_request("rating=3&guest_id=2&episode_id=1")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, test_request("GET", "/episodes/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["date"], "2023-01-01");
    assert_eq!(body["number"], 1);

    let appearances = body["appearances"].as_array().unwrap();
    assert_eq!(appearances.len(), 2);
    assert_eq!(
        appearances[0],
        json!({
            "id": 1,
            "rating": 5,
            "guest_id": 1,
            "episode_id": 1,
            "guest": {"id": 1, "name": "John Mwangi", "occupation": "Actor"},
        })
    );
    for appearance in appearances {
        assert!(appearance.get("episode").is_none());
        let guest = appearance["guest"].as_object().unwrap();
        assert!(!guest.contains_key("appearances"));
        assert!(!guest.contains_key("episodes"));
    }
}

#[tokio::test]
async fn test_get_episode_not_found() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/episodes/999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Episode not found"]}));
}

#[tokio::test]
async fn test_get_episode_non_integer_id() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/episodes/pilot")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Episode not found"]}));
}

#[tokio::test]
async fn test_delete_episode_cascades() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    send(&app, form_request("rating=2&guest_id=5&episode_id=3")).await;
    assert_eq!(db::appearances::list_for_episode(&pool, 3).await.unwrap().len(), 2);

    let (status, body) = send(&app, test_request("DELETE", "/episodes/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Episode deleted successfully"}));

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM appearances WHERE episode_id = 3")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
    assert_eq!(db::appearances::count(&pool).await.unwrap(), 9);

    let (status, body) = send(&app, test_request("GET", "/episodes/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Episode not found"]}));
}

#[tokio::test]
async fn test_delete_episode_not_found() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("DELETE", "/episodes/999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Episode not found"]}));
}

#[tokio::test]
async fn test_delete_episode_storage_failure_rolls_back() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    // Make the cascade step fail after the lookup succeeds
    sqlx::query(
        "CREATE TRIGGER block_appearance_delete BEFORE DELETE ON appearances \
         BEGIN SELECT RAISE(ABORT, 'appearance delete blocked'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (status, body) = send(&app, test_request("DELETE", "/episodes/2")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["errors"][0].as_str().unwrap();
    assert!(message.contains("appearance delete blocked"), "got {}", message);

    // Nothing was removed
    assert!(db::episodes::find(&pool, 2).await.unwrap().is_some());
    assert_eq!(db::appearances::count(&pool).await.unwrap(), 10);
}

// =============================================================================
// Guests
// =============================================================================

#[tokio::test]
async fn test_list_guests() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/guests")).await;

    assert_eq!(status, StatusCode::OK);
    let guests = body.as_array().unwrap();
    assert_eq!(guests.len(), 10);
    assert_eq!(
        guests[9],
        json!({"id": 10, "name": "Sophia Mutheu", "occupation": "Influencer"})
    );
}

#[tokio::test]
async fn test_get_guest_nests_episodes() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/guests/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Achieng");
    let appearances = body["appearances"].as_array().unwrap();
    assert_eq!(appearances.len(), 1);
    assert!(appearances[0].get("guest").is_none());
    assert_eq!(
        appearances[0]["episode"],
        json!({"id": 2, "date": "2023-01-02", "number": 2})
    );
}

#[tokio::test]
async fn test_get_guest_not_found() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("GET", "/guests/77")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Guest not found"]}));
}

// =============================================================================
// Appearances
// =============================================================================

#[tokio::test]
async fn test_create_appearance() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, form_request("rating=4&guest_id=3&episode_id=7")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 11,
            "rating": 4,
            "guest_id": 3,
            "episode_id": 7,
            "episode": {"id": 7, "date": "2023-01-07", "number": 7},
            "guest": {"id": 3, "name": "Chris Mutua", "occupation": "Comedian"},
        })
    );
}

#[tokio::test]
async fn test_create_appearance_twice_is_duplicate() {
    let pool = db::connect_in_memory().await.unwrap();
    // Fresh store with one guest and one episode and no appearances yet
    db::guests::insert(&pool, &db::NewGuest::new("Anna Muteti", "Producer").unwrap())
        .await
        .unwrap();
    db::episodes::insert(&pool, &db::NewEpisode::new("2023-01-01", 1).unwrap())
        .await
        .unwrap();
    let app = setup_app(pool.clone());

    let (status, _) = send(&app, form_request("rating=4&guest_id=1&episode_id=1")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, form_request("rating=4&guest_id=1&episode_id=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"errors": ["Duplicate appearance for the guest and episode on this date"]})
    );

    assert_eq!(db::appearances::count_for_pair(&pool, 1, 1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_appearance_rating_out_of_range() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, form_request("rating=6&guest_id=1&episode_id=1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Rating must be between 1 and 5"]}));
}

#[tokio::test]
async fn test_create_appearance_missing_fields() {
    let app = setup_app(setup_test_db().await);

    for body in ["", "rating=4&guest_id=1", "rating=&guest_id=1&episode_id=1"] {
        let (status, json_body) = send(&app, form_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(json_body, json!({"errors": ["Missing required fields"]}));
    }
}

#[tokio::test]
async fn test_create_appearance_non_integer_fields() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, form_request("rating=four&guest_id=1&episode_id=2")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"errors": ["guest_id, episode_id, and rating must be integers"]})
    );
}

#[tokio::test]
async fn test_create_appearance_unknown_parents() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let (status, body) = send(&app, form_request("rating=3&guest_id=1&episode_id=500")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Episode not found"]}));

    let (status, body) = send(&app, form_request("rating=3&guest_id=500&episode_id=1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Guest not found"]}));

    assert_eq!(db::appearances::count(&pool).await.unwrap(), 10);
}

#[tokio::test]
async fn test_create_appearance_oversized_integers() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(
        &app,
        form_request("rating=3&guest_id=99999999999999999999&episode_id=1"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Guest not found"]}));

    let (status, body) = send(
        &app,
        form_request("rating=99999999999999999999&guest_id=1&episode_id=2"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Rating must be between 1 and 5"]}));
}

#[tokio::test]
async fn test_create_appearance_from_multipart_form() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let boundary = "lateshow-boundary";
    let mut body = String::new();
    for (name, value) in [("rating", "4"), ("guest_id", "2"), ("episode_id", "1")] {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    let request = Request::builder()
        .method("POST")
        .uri("/appearances")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 4);
    assert_eq!(body["guest"]["id"], 2);
    assert_eq!(body["episode"]["id"], 1);
    assert_eq!(db::appearances::count_for_pair(&pool, 2, 1).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_appearance_without_body_is_missing_fields() {
    let app = setup_app(setup_test_db().await);

    let (status, body) = send(&app, test_request("POST", "/appearances")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Missing required fields"]}));
}

#[tokio::test]
async fn test_create_appearance_unsupported_body_is_missing_fields() {
    let pool = setup_test_db().await;
    let app = setup_app(pool.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/appearances")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"rating":4,"guest_id":1,"episode_id":2}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"errors": ["Missing required fields"]}));
    assert_eq!(db::appearances::count(&pool).await.unwrap(), 10);
}
