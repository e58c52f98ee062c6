#![allow(dead_code)]

use api::{auth::generate_jwt, routes::routes};
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use chrono::{Duration, Utc};
use db::models::{
    attendance_session::Model as SessionModel,
    event::Model as EventModel,
    team::Model as TeamModel,
    team_membership::{Model as TeamMembershipModel, Role},
    user::Model as UserModel,
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use services::code::hash_code;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower::ServiceExt;
use util::{config::AppConfig, state::AppState};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Router mounted at `/api` over a fresh in-memory database.
pub async fn make_test_app() -> (Router, AppState) {
    AppConfig::set_jwt_secret(TEST_JWT_SECRET);
    AppConfig::set_checkin_max_attempts(5u64);
    AppConfig::set_checkin_attempt_window_minutes(5i64);
    AppConfig::set_trust_forwarded_for(false);

    let app_state = AppState::new(setup_test_db().await);
    let router = Router::new().nest("/api", routes(app_state.clone()));
    (router, app_state)
}

/// Attaches a `ConnectInfo<SocketAddr>` the way the real server does.
pub fn with_connect_info(mut req: Request<Body>, ip: [u8; 4]) -> Request<Body> {
    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), 43210);
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

/// Sends one request and returns the status with the JSON body (`Null` when
/// the body is not JSON).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&UserModel>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        let (token, _) = generate_jwt(user.id, user.admin).unwrap();
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let req = with_connect_info(req, [198, 51, 100, 9]);

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub struct Seeded {
    pub team: TeamModel,
    pub event: EventModel,
    pub session: SessionModel,
    pub admin: UserModel,
    pub member: UserModel,
    pub other_member: UserModel,
    pub outsider: UserModel,
    pub root: UserModel,
}

/// A team with an admin and two members, an outsider, a global admin, and an
/// open session with code `ABC123` on an event running an hour either side of now.
pub async fn seed(app_state: &AppState) -> Seeded {
    let db = app_state.db();
    let team = TeamModel::create(db, "Robotics").await.unwrap();
    let admin = UserModel::create(db, "captain", "captain@test.com", false).await.unwrap();
    let member = UserModel::create(db, "member1", "member1@test.com", false).await.unwrap();
    let other_member = UserModel::create(db, "member2", "member2@test.com", false).await.unwrap();
    let outsider = UserModel::create(db, "outsider", "outsider@test.com", false).await.unwrap();
    let root = UserModel::create(db, "root", "root@test.com", true).await.unwrap();

    TeamMembershipModel::assign_user_to_team(db, admin.id, team.id, Role::Admin).await.unwrap();
    TeamMembershipModel::assign_user_to_team(db, member.id, team.id, Role::Member).await.unwrap();
    TeamMembershipModel::assign_user_to_team(db, other_member.id, team.id, Role::Member).await.unwrap();

    let now = Utc::now();
    let event = EventModel::create(
        db,
        team.id,
        admin.id,
        "Weekly build night",
        now - Duration::hours(1),
        now + Duration::hours(1),
        5,
    )
    .await
    .unwrap();
    let session = SessionModel::create(db, event.id, admin.id, &hash_code("ABC123").unwrap())
        .await
        .unwrap();

    Seeded {
        team,
        event,
        session,
        admin,
        member,
        other_member,
        outsider,
        root,
    }
}
