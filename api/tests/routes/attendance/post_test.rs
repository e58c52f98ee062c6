use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use db::models::{
    attendance_session::{AttendanceStatus, Model as SessionModel},
    check_in::Model as CheckInModel,
    event::{EventChanges, Model as EventModel},
    verification_attempt::Entity as AttemptEntity,
};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

use crate::helpers::{make_test_app, seed, send, with_connect_info};

fn checkin_uri(session_id: i64) -> String {
    format!("/api/attendance/{session_id}/checkin")
}

#[tokio::test]
#[serial]
async fn check_in_with_valid_code_then_repeat() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = checkin_uri(s.session.id);

    let (status, json) = send(&app, "POST", &uri, Some(&s.member), Some(json!({ "code": "abc123" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["already_checked_in"], false);
    assert_eq!(json["data"]["check_in"]["user_id"], s.member.id);
    assert_eq!(json["data"]["check_in"]["source"], "code");
    let first_id = json["data"]["check_in"]["id"].as_i64().unwrap();

    let (status, json) = send(&app, "POST", &uri, Some(&s.member), Some(json!({ "code": "ABC123" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["already_checked_in"], true);
    assert_eq!(json["data"]["check_in"]["id"], first_id);

    assert_eq!(CheckInModel::count_for_session(state.db(), s.session.id).await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn wrong_code_is_rejected_and_logged() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;

    let (status, json) = send(
        &app,
        "POST",
        &checkin_uri(s.session.id),
        Some(&s.member),
        Some(json!({ "code": "WRONG1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid attendance code");

    let attempts = AttemptEntity::find().all(state.db()).await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert!(!attempts[0].success);
    assert_eq!(attempts[0].client_ip.as_deref(), Some("198.51.100.9"));
}

#[tokio::test]
#[serial]
async fn sixth_attempt_is_rate_limited() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = checkin_uri(s.session.id);

    for _ in 0..5 {
        let (status, _) = send(&app, "POST", &uri, Some(&s.member), Some(json!({ "code": "WRONG1" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, json) = send(&app, "POST", &uri, Some(&s.member), Some(json!({ "code": "ABC123" }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["success"], false);
    assert_eq!(AttemptEntity::find().count(state.db()).await.unwrap(), 5);
}

#[tokio::test]
#[serial]
async fn same_address_is_limited_across_users() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = checkin_uri(s.session.id);

    for _ in 0..5 {
        send(&app, "POST", &uri, Some(&s.member), Some(json!({ "code": "WRONG1" }))).await;
    }

    // send() always uses 198.51.100.9
    let (status, _) = send(&app, "POST", &uri, Some(&s.other_member), Some(json!({ "code": "ABC123" }))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
#[serial]
async fn outside_window_returns_bounds() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;

    let start = Utc::now() + Duration::minutes(6);
    let event = EventModel::update(
        state.db(),
        s.event.id,
        EventChanges {
            start_time: Some(start),
            end_time: Some(start + Duration::hours(1)),
            grace_minutes: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (status, json) = send(
        &app,
        "POST",
        &checkin_uri(s.session.id),
        Some(&s.member),
        Some(json!({ "code": "ABC123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["grace_minutes"], 5);
    let reported: chrono::DateTime<Utc> = json["data"]["event_start"].as_str().unwrap().parse().unwrap();
    assert!((reported - event.start_time).num_seconds().abs() < 1);
    assert!(json["data"]["event_end"].is_string());
    assert_eq!(AttemptEntity::find().count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn cancelled_session_rejected_even_with_correct_code() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    SessionModel::update(state.db(), s.session.id, Some(AttendanceStatus::Cancelled), None)
        .await
        .unwrap();

    let (status, json) = send(
        &app,
        "POST",
        &checkin_uri(s.session.id),
        Some(&s.member),
        Some(json!({ "code": "ABC123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Attendance session has been cancelled");
    assert_eq!(AttemptEntity::find().count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn malformed_code_is_a_validation_error() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = checkin_uri(s.session.id);

    for body in [json!({ "code": "abc" }), json!({ "code": "ABCDEFGHIJK" }), json!({})] {
        let (status, json) = send(&app, "POST", &uri, Some(&s.member), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Code must be between 6 and 10 characters");
    }
    assert_eq!(AttemptEntity::find().count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn mistyped_body_gets_enveloped_bad_request() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = checkin_uri(s.session.id);

    for body in [json!({ "code": 123456 }), json!({ "code": null }), json!({ "code": ["ABC123"] })] {
        let (status, json) = send(&app, "POST", &uri, Some(&s.member), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().starts_with("Invalid request body"));
    }
    assert_eq!(AttemptEntity::find().count(state.db()).await.unwrap(), 0);
    assert_eq!(CheckInModel::count_for_session(state.db(), s.session.id).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn check_in_succeeds_when_attempt_log_is_unwritable() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    state
        .db()
        .execute_unprepared(
            "CREATE TRIGGER reject_attempts BEFORE INSERT ON verification_attempts \
             BEGIN SELECT RAISE(ABORT, 'attempt log unavailable'); END;",
        )
        .await
        .unwrap();

    let (status, json) = send(
        &app,
        "POST",
        &checkin_uri(s.session.id),
        Some(&s.member),
        Some(json!({ "code": "ABC123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Checked in successfully");
    assert_eq!(json["data"]["already_checked_in"], false);

    assert_eq!(CheckInModel::count_for_session(state.db(), s.session.id).await.unwrap(), 1);
    assert_eq!(AttemptEntity::find().count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn access_errors() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let body = json!({ "code": "ABC123" });

    let (status, _) = send(&app, "POST", &checkin_uri(s.session.id), None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", &checkin_uri(s.session.id), Some(&s.outsider), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // a global admin still needs to belong to the team to check in
    let (status, _) = send(&app, "POST", &checkin_uri(s.session.id), Some(&s.root), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "POST", &checkin_uri(9999), Some(&s.member), Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn forwarded_for_is_used_only_when_trusted() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    util::config::AppConfig::set_trust_forwarded_for(true);

    let (token, _) = api::auth::generate_jwt(s.member.id, false).unwrap();
    let req = Request::builder()
        .method("POST")
        .uri(checkin_uri(s.session.id))
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", "application/json")
        .header("X-Forwarded-For", "203.0.113.50, 10.0.0.1")
        .body(Body::from(json!({ "code": "WRONG1" }).to_string()))
        .unwrap();
    let response = app.oneshot(with_connect_info(req, [10, 0, 0, 1])).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let attempts = AttemptEntity::find().all(state.db()).await.unwrap();
    assert_eq!(attempts[0].client_ip.as_deref(), Some("203.0.113.50"));
    util::config::AppConfig::set_trust_forwarded_for(false);
}

#[tokio::test]
#[serial]
async fn manual_check_in_by_admin() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/attendance/{}/checkins/manual", s.session.id);

    let (status, _) = send(&app, "POST", &uri, Some(&s.member), Some(json!({ "user_id": s.other_member.id }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(&app, "POST", &uri, Some(&s.admin), Some(json!({ "user_id": s.other_member.id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["check_in"]["source"], "manual");
    assert_eq!(json["data"]["already_checked_in"], false);

    let (status, _) = send(&app, "POST", &uri, Some(&s.admin), Some(json!({ "user_id": s.outsider.id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // a code check-in afterwards is a repeat
    let (status, json) = send(
        &app,
        "POST",
        &checkin_uri(s.session.id),
        Some(&s.other_member),
        Some(json!({ "code": "ABC123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["already_checked_in"], true);
}
