use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use crate::helpers::{make_test_app, seed, send};

#[tokio::test]
#[serial]
async fn summary_for_members_hides_code_hash() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let uri = format!("/api/attendance/{}", s.session.id);

    send(
        &app,
        "POST",
        &format!("/api/attendance/{}/checkin", s.session.id),
        Some(&s.member),
        Some(json!({ "code": "ABC123" })),
    )
    .await;

    let (status, json) = send(&app, "GET", &uri, Some(&s.member), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["session"]["status"], "open");
    assert_eq!(json["data"]["check_in_count"], 1);
    assert_eq!(json["data"]["my_check_in"]["user_id"], s.member.id);
    assert_eq!(json["data"]["event"]["grace_minutes"], 5);
    assert!(json["data"]["opens_at"].is_string());
    assert!(!json.to_string().contains("code_hash"));
    assert!(!json.to_string().contains("argon2"));

    let (_, json) = send(&app, "GET", &uri, Some(&s.other_member), None).await;
    assert!(json["data"]["my_check_in"].is_null());

    let (status, _) = send(&app, "GET", &uri, Some(&s.outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, Some(&s.root), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn check_in_list_is_admin_only_with_usernames() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;

    for user in [&s.member, &s.other_member] {
        send(
            &app,
            "POST",
            &format!("/api/attendance/{}/checkin", s.session.id),
            Some(user),
            Some(json!({ "code": "ABC123" })),
        )
        .await;
    }

    let uri = format!("/api/attendance/{}/checkins", s.session.id);
    let (status, _) = send(&app, "GET", &uri, Some(&s.member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = send(&app, "GET", &uri, Some(&s.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["username"], "member1");
    assert_eq!(entries[1]["username"], "member2");
}

#[tokio::test]
#[serial]
async fn attempts_are_paginated_and_filtered() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;
    let checkin = format!("/api/attendance/{}/checkin", s.session.id);

    for code in ["WRONG1", "WRONG2", "ABC123"] {
        send(&app, "POST", &checkin, Some(&s.member), Some(json!({ "code": code }))).await;
    }

    let base = format!("/api/attendance/{}/attempts", s.session.id);
    let (status, json) = send(&app, "GET", &format!("{base}?per_page=2"), Some(&s.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["attempts"].as_array().unwrap().len(), 2);

    let (_, json) = send(&app, "GET", &format!("{base}?success=false"), Some(&s.admin), None).await;
    assert_eq!(json["data"]["total"], 2);

    let (status, _) = send(&app, "GET", &format!("{base}?per_page=101"), Some(&s.admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", &base, Some(&s.member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn non_numeric_session_id_is_bad_request() {
    let (app, state) = make_test_app().await;
    let s = seed(&state).await;

    let (status, _) = send(&app, "GET", "/api/attendance/abc", Some(&s.member), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
