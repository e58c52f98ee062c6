use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use crate::helpers::{make_test_app, seed, send};

#[tokio::test]
#[serial]
async fn cancel_then_reopen() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/attendance/{}", s.session.id);
    let checkin = format!("/api/attendance/{}/checkin", s.session.id);

    let (status, json) = send(&app, "PUT", &uri, Some(&s.admin), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["session"]["status"], "cancelled");
    assert!(json["data"].get("code").is_none());

    let (status, _) = send(&app, "POST", &checkin, Some(&s.member), Some(json!({ "code": "ABC123" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&app, "PUT", &uri, Some(&s.admin), Some(json!({ "status": "open" }))).await;
    let (status, _) = send(&app, "POST", &checkin, Some(&s.member), Some(json!({ "code": "ABC123" }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn rotating_code_invalidates_old_one() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/attendance/{}", s.session.id);
    let checkin = format!("/api/attendance/{}/checkin", s.session.id);

    let (status, json) = send(&app, "PUT", &uri, Some(&s.admin), Some(json!({ "code": "fresh123" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["code"], "FRESH123");

    let (status, _) = send(&app, "POST", &checkin, Some(&s.member), Some(json!({ "code": "ABC123" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "POST", &checkin, Some(&s.member), Some(json!({ "code": "FRESH123" }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn update_rejects_members_and_bad_codes() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/attendance/{}", s.session.id);

    let (status, _) = send(&app, "PUT", &uri, Some(&s.member), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &uri, Some(&s.admin), Some(json!({ "code": "abc" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(&s.root), Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::OK);
}
