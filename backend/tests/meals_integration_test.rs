//! Integration tests for the meal endpoints

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use meal_journal_backend::repositories::MealRepository;
use serde_json::json;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Validation failures are rejected before the database is touched, so these
// run without a live Postgres.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_meal_rejects_empty_food_items() {
    let app = common::TestApp::new();

    let body = json!({ "meal_type": "lunch", "food_items": [] });
    let (status, response) = app
        .post("/api/v1/meals/record", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_create_meal_rejects_unknown_meal_type() {
    let app = common::TestApp::new();

    let mut body = common::sample_meal_body();
    body["meal_type"] = json!("brunch");
    let (status, _) = app
        .post("/api/v1/meals/record", &body.to_string())
        .await;

    // rejected during deserialization
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_create_meal_rejects_negative_calories() {
    let app = common::TestApp::new();

    let mut body = common::sample_meal_body();
    body["food_items"][0]["calories"] = json!(-10.0);
    let (status, _) = app
        .post("/api/v1/meals/record", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_meal_rejects_overlong_name() {
    let app = common::TestApp::new();

    let mut body = common::sample_meal_body();
    body["food_items"][0]["name"] = json!("x".repeat(101));
    let (status, _) = app
        .post("/api/v1/meals/record", &body.to_string())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_rejects_days_below_range() {
    let app = common::TestApp::new();

    let (status, response) = app.get("/api/v1/meals/history?days=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_history_rejects_days_above_range() {
    let app = common::TestApp::new();

    let (status, _) = app.get("/api/v1/meals/history?days=31").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_rejects_non_numeric_days() {
    let app = common::TestApp::new();

    let (status, _) = app.get("/api/v1/meals/history?days=week").await;

    assert!(status.is_client_error());
}

// ---------------------------------------------------------------------------
// Database-backed tests
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_meal_computes_totals() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let (status, response) = app
        .post("/api/v1/meals/record", &common::sample_meal_body().to_string())
        .await;

    assert_eq!(status, StatusCode::CREATED);

    let meal: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(meal["meal_type"], "lunch");
    assert_eq!(meal["total_calories"], 350.0);
    assert_eq!(meal["total_protein"], 30.0);
    assert_eq!(meal["total_carbs"], 35.0);
    assert_eq!(meal["total_fat"], 10.0);

    // items come back in the order they were given
    let items = meal["food_items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Chicken breast");
    assert_eq!(items[1]["name"], "Rice bowl");
    assert!(!meal["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_created_meal_round_trips_through_today() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let mut body = common::sample_meal_body();
    body["eaten_at"] = json!(Utc::now());
    let (status, response) = app
        .post("/api/v1/meals/record", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&response).unwrap();

    let (status, response) = app.get("/api/v1/meals/today").await;
    assert_eq!(status, StatusCode::OK);

    let meals: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    let matches: Vec<_> = meals
        .iter()
        .filter(|m| m["id"] == created["id"])
        .collect();

    // appears exactly once, with identical totals and items
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["total_calories"], created["total_calories"]);
    assert_eq!(matches[0]["food_items"], created["food_items"]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_today_excludes_older_records() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let mut body = common::sample_meal_body();
    body["eaten_at"] = json!(Utc::now() - Duration::days(2));
    let (status, response) = app
        .post("/api/v1/meals/record", &body.to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&response).unwrap();

    let (status, response) = app.get("/api/v1/meals/today").await;
    assert_eq!(status, StatusCode::OK);

    let meals: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    assert!(meals.iter().all(|m| m["id"] != created["id"]));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_history_window_boundaries() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let mut inside = common::sample_meal_body();
    inside["food_items"][0]["name"] = json!(common::random_food_name());
    inside["eaten_at"] = json!(Utc::now() - Duration::days(7) + Duration::seconds(5));
    let (_, response) = app
        .post("/api/v1/meals/record", &inside.to_string())
        .await;
    let inside: serde_json::Value = serde_json::from_str(&response).unwrap();

    let mut outside = common::sample_meal_body();
    outside["eaten_at"] = json!(Utc::now() - Duration::days(8));
    let (_, response) = app
        .post("/api/v1/meals/record", &outside.to_string())
        .await;
    let outside: serde_json::Value = serde_json::from_str(&response).unwrap();

    let (status, response) = app.get("/api/v1/meals/history?days=7").await;
    assert_eq!(status, StatusCode::OK);

    let meals: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    assert!(meals.iter().any(|m| m["id"] == inside["id"]));
    assert!(meals.iter().all(|m| m["id"] != outside["id"]));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_history_orders_newest_first() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    for days_ago in [3, 1, 2] {
        let mut body = common::sample_meal_body();
        body["eaten_at"] = json!(Utc::now() - Duration::days(days_ago));
        let (status, _) = app
            .post("/api/v1/meals/record", &body.to_string())
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, response) = app.get("/api/v1/meals/history?days=7").await;
    assert_eq!(status, StatusCode::OK);

    let meals: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    assert_eq!(meals.len(), 3);
    let eaten: Vec<&str> = meals.iter().map(|m| m["eaten_at"].as_str().unwrap()).collect();
    let mut sorted = eaten.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(eaten, sorted);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_records_with_equal_eaten_at_both_returned() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let eaten_at = Utc::now() - Duration::hours(1);
    let mut ids = Vec::new();
    for _ in 0..2 {
        let mut body = common::sample_meal_body();
        body["eaten_at"] = json!(eaten_at);
        let (status, response) = app
            .post("/api/v1/meals/record", &body.to_string())
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: serde_json::Value = serde_json::from_str(&response).unwrap();
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let (status, response) = app.get("/api/v1/meals/history?days=1").await;
    assert_eq!(status, StatusCode::OK);

    let meals: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    for id in &ids {
        let count = meals.iter().filter(|m| m["id"] == id.as_str()).count();
        assert_eq!(count, 1, "record {} should appear exactly once", id);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_today_empty_returns_empty_list() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let (status, response) = app.get("/api/v1/meals/today").await;

    assert_eq!(status, StatusCode::OK);
    let meals: Vec<serde_json::Value> = serde_json::from_str(&response).unwrap();
    assert!(meals.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_cascades_to_food_items() {
    let app = common::TestApp::with_database().await;
    app.cleanup().await;

    let (status, response) = app
        .post("/api/v1/meals/record", &common::sample_meal_body().to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&response).unwrap();
    let meal_id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let deleted = MealRepository::delete(&app.pool, meal_id).await.unwrap();
    assert!(deleted);

    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM food_items WHERE meal_record_id = $1")
            .bind(meal_id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(count, 0);

    // deleting again reports nothing removed
    assert!(!MealRepository::delete(&app.pool, meal_id).await.unwrap());
}
