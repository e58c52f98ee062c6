use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use serial_test::serial;

use crate::helpers::{make_test_app, seed, send};

#[tokio::test]
#[serial]
async fn team_admin_creates_event_and_opens_session() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let start = Utc::now();

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/teams/{}/events", s.team.id),
        Some(&s.admin),
        Some(json!({
            "title": "Scrimmage",
            "start_time": start.to_rfc3339(),
            "end_time": (start + Duration::hours(2)).to_rfc3339(),
            "grace_minutes": 10
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["grace_minutes"], 10);
    let event_id = json["data"]["id"].as_i64().unwrap();

    let open = format!("/api/events/{event_id}/attendance");
    let (status, json) = send(&app, "POST", &open, Some(&s.admin), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let code = json["data"]["code"].as_str().unwrap().to_owned();
    assert_eq!(code.len(), 6);
    let session_id = json["data"]["session"]["id"].as_i64().unwrap();
    assert!(json["data"]["session"].get("code_hash").is_none());

    let (status, _) = send(&app, "POST", &open, Some(&s.admin), Some(json!({ "code": "ZZZ999" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/attendance/{session_id}/checkin"),
        Some(&s.member),
        Some(json!({ "code": code.to_lowercase() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["already_checked_in"], false);
}

#[tokio::test]
#[serial]
async fn create_event_validation() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/teams/{}/events", s.team.id);
    let start = Utc::now();

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&s.admin),
        Some(json!({
            "title": "Backwards",
            "start_time": start.to_rfc3339(),
            "end_time": (start - Duration::minutes(1)).to_rfc3339()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&s.admin),
        Some(json!({
            "title": "Negative",
            "start_time": start.to_rfc3339(),
            "end_time": start.to_rfc3339(),
            "grace_minutes": -1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &uri,
        Some(&s.member),
        Some(json!({
            "title": "Not mine",
            "start_time": start.to_rfc3339(),
            "end_time": start.to_rfc3339()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(
        &app,
        "POST",
        &uri,
        Some(&s.admin),
        Some(json!({
            "title": "   ",
            "start_time": start.to_rfc3339(),
            "end_time": start.to_rfc3339()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Title must not be blank");

    let (status, json) = send(
        &app,
        "POST",
        &uri,
        Some(&s.admin),
        Some(json!({
            "title": "No end",
            "start_time": start.to_rfc3339(),
            "end_time": "tomorrow"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
#[serial]
async fn create_event_for_unknown_team() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let start = Utc::now();

    let (status, json) = send(
        &app,
        "POST",
        "/api/teams/9999/events",
        Some(&s.root),
        Some(json!({
            "title": "Ghost practice",
            "start_time": start.to_rfc3339(),
            "end_time": (start + Duration::hours(1)).to_rfc3339()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Team not found");
}

#[tokio::test]
#[serial]
async fn get_and_update_event() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/events/{}", s.event.id);

    let (status, json) = send(&app, "GET", &uri, Some(&s.member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Weekly build night");

    let (status, _) = send(&app, "GET", &uri, Some(&s.outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &uri, Some(&s.member), Some(json!({ "grace_minutes": 15 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(&app, "PUT", &uri, Some(&s.admin), Some(json!({ "grace_minutes": 15 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["grace_minutes"], 15);
    assert_eq!(json["data"]["title"], "Weekly build night");

    let (status, _) = send(&app, "GET", "/api/events/424242", Some(&s.member), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
