//! End-to-end tests for the schedule flow: master creation, weekly
//! resolution, overriding, suppression, and materialization over HTTP.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, send_json};
use sqlx::PgPool;

// 2026-08-02 is a Sunday, 2026-08-03 a Monday.
const MONDAY: &str = "2026-08-03";

async fn create_monday_master(pool: &PgPool) -> i64 {
    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/schedule/masters",
        serde_json::json!({
            "day_of_week": 1,
            "start_time": "10:00:00",
            "end_time": "11:00:00",
            "show_name": "Morning Show",
            "host_name": "Alex"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn week_view_projects_master_as_virtual(pool: PgPool) {
    let master_id = create_monday_master(&pool).await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/schedule/week?date={MONDAY}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let slots = json["data"].as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["show_name"], "Morning Show");
    assert_eq!(slots[0]["is_virtual"], true);
    assert_eq!(slots[0]["date"], MONDAY);
    assert_eq!(
        slots[0]["id"],
        serde_json::json!(format!("virtual-{master_id}-{MONDAY}"))
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inverted_range_returns_invalid_range(pool: PgPool) {
    let response = get(
        common::build_test_app(pool),
        "/api/v1/schedule?start=2026-08-08&end=2026-08-02",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_RANGE");
}

// ---------------------------------------------------------------------------
// Overrides and conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn override_replaces_master_in_week_view(pool: PgPool) {
    let master_id = create_monday_master(&pool).await;

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/schedule/instances",
        serde_json::json!({
            "slot_date": MONDAY,
            "parent_slot_id": master_id,
            "start_time": "10:00:00",
            "end_time": "11:00:00",
            "show_name": "Special Edition"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let week = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/schedule/week?date={MONDAY}"),
        )
        .await,
    )
    .await;
    let slots = week["data"].as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["show_name"], "Special Edition");
    assert_eq!(slots[0]["is_virtual"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overlapping_custom_slot_is_rejected(pool: PgPool) {
    create_monday_master(&pool).await;

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/schedule/instances",
        serde_json::json!({
            "slot_date": MONDAY,
            "start_time": "10:30:00",
            "end_time": "11:30:00",
            "show_name": "Clashing Show"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Occurrences
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn materialize_keeps_week_view_stable(pool: PgPool) {
    let master_id = create_monday_master(&pool).await;

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/schedule/occurrences/materialize",
        serde_json::json!({ "master_id": master_id, "date": MONDAY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Second call is a no-op.
    let repeat = send_json(
        common::build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/schedule/occurrences/materialize",
        serde_json::json!({ "master_id": master_id, "date": MONDAY }),
    )
    .await;
    assert_eq!(repeat.status(), StatusCode::OK);
    assert_eq!(body_json(repeat).await["data"]["created"], false);

    // Same occurrence, now real.
    let week = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/schedule/week?date={MONDAY}"),
        )
        .await,
    )
    .await;
    let slots = week["data"].as_array().unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0]["show_name"], "Morning Show");
    assert_eq!(slots[0]["is_virtual"], false);
    assert!(slots[0]["id"].is_i64());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn suppressed_occurrence_disappears_from_week_view(pool: PgPool) {
    let master_id = create_monday_master(&pool).await;

    let response = send_json(
        common::build_test_app(pool.clone()),
        Method::DELETE,
        &format!("/api/v1/schedule/occurrences?master_id={master_id}&date={MONDAY}"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let week = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/schedule/week?date={MONDAY}"),
        )
        .await,
    )
    .await;
    assert!(week["data"].as_array().unwrap().is_empty());

    // The master template itself is untouched.
    let masters = body_json(
        get(common::build_test_app(pool), "/api/v1/schedule/masters").await,
    )
    .await;
    assert_eq!(masters["data"].as_array().unwrap().len(), 1);
}
