// Integration tests for the Teamcal API
// Run with: cargo test -p teamcal-server --test api_test
// Drives the full router in-process against the in-memory backend in JWT mode.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use teamcal_core::{LocalZone, Role};
use teamcal_server::auth::{AuthConfig, JwtService};
use teamcal_server::storage::{CreateTeamMemberRow, CreateUserRow, StorageBackend};
use teamcal_server::{build_router, ServerConfig};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

struct TestApp {
    router: Router,
    db: Arc<StorageBackend>,
    jwt: JwtService,
}

impl TestApp {
    fn new() -> Self {
        let db = Arc::new(StorageBackend::in_memory());
        let auth = AuthConfig::jwt(SECRET);
        let jwt = JwtService::new(auth.jwt.clone());
        let config = ServerConfig {
            zone: LocalZone::from_offset_minutes(9 * 60).unwrap(),
            ..ServerConfig::default()
        };
        let router = build_router(&config, auth, db.clone());
        Self { router, db, jwt }
    }

    async fn user(&self, emp: &str, name: &str, role: Role, status: &str) -> (i64, String) {
        let row = self
            .db
            .create_user(CreateUserRow {
                employee_number: emp.to_string(),
                name: name.to_string(),
                role: role.to_string(),
                status: status.to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        let token = self
            .jwt
            .generate_access_token(row.id, emp, name, role)
            .unwrap();
        (row.id, token)
    }

    async fn join(&self, team_id: i64, user_id: i64) {
        self.db
            .add_team_member(CreateTeamMemberRow {
                team_id,
                user_id,
                role: "MEMBER".to_string(),
            })
            .await
            .unwrap();
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

#[tokio::test]
async fn test_authentication_is_enforced() {
    let app = TestApp::new();
    let (_, pending_token) = app.user("P00001", "Pending", Role::User, "PENDING").await;
    let (_, user_token) = app.user("U00001", "User", Role::User, "APPROVED").await;

    let (status, body) = app.send(Method::GET, "/teams/my", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let (status, _) = app
        .send(Method::GET, "/teams/my", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/teams/my", Some(&pending_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::GET, "/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_event_workflow() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("ADMIN1", "Admin", Role::Admin, "APPROVED").await;
    let (member_id, member_token) = app.user("M00001", "Member", Role::User, "APPROVED").await;
    let (_, other_token) = app.user("O00001", "Other", Role::User, "APPROVED").await;

    println!("Step 1: admin creates a team and adds the member");
    let (status, team) = app
        .send(
            Method::POST,
            "/teams",
            Some(&admin_token),
            Some(json!({"name": "Platform"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = team["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/teams/{team_id}/members"),
            Some(&admin_token),
            Some(json!({"userId": member_id})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/teams/{team_id}/members"),
            Some(&admin_token),
            Some(json!({"userId": member_id})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, teams) = app
        .send(Method::GET, "/teams/my", Some(&member_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams["data"][0]["name"], "Platform");

    println!("Step 2: member creates an event");
    let (status, event) = app
        .send(
            Method::POST,
            "/events",
            Some(&member_token),
            Some(json!({
                "title": "Sprint review",
                "eventType": "meeting",
                "startDate": "2025-06-10T09:00",
                "endDate": "2025-06-10T18:00",
                "teamId": team_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{event}");
    let event_id = event["id"].as_i64().unwrap();
    assert_eq!(event["eventType"], "MEETING");
    // Wall-clock fields are stored as-is whatever the zone
    assert_eq!(event["start"], "2025-06-10T09:00:00Z");
    assert_eq!(event["end"], "2025-06-10T18:00:00Z");

    println!("Step 3: list shows an exclusive end, get shows the inclusive end");
    let (status, list) = app
        .send(
            Method::GET,
            &format!("/events?teamId={team_id}&startDate=2025-06-01&endDate=2025-06-30"),
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert_eq!(list["data"][0]["end"], "2025-06-11T00:00:00Z");
    assert_eq!(list["data"][0]["endDate"], "2025-06-10T18:00:00Z");

    let (status, fetched) = app
        .send(
            Method::GET,
            &format!("/events/{event_id}"),
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["end"], "2025-06-10T18:00:00Z");

    println!("Step 4: outsiders are refused");
    let (status, _) = app
        .send(
            Method::GET,
            &format!("/events/{event_id}"),
            Some(&other_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/events/{event_id}"),
            Some(&other_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    println!("Step 5: invalid updates are rejected");
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/events/{event_id}"),
            Some(&member_token),
            Some(json!({"startDate": "2025-06-11T09:00"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "start must not be after end");

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/events/{event_id}"),
            Some(&member_token),
            Some(json!({"title": "Sprint demo", "endTime": "17:30"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Sprint demo");
    assert_eq!(updated["end"], "2025-06-10T17:30:00Z");

    println!("Step 6: owner deletes");
    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/events/{event_id}"),
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/events/{event_id}"),
            Some(&member_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_validation_errors() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("ADMIN1", "Admin", Role::Admin, "APPROVED").await;
    let (status, team) = app
        .send(
            Method::POST,
            "/teams",
            Some(&admin_token),
            Some(json!({"name": "Ops"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let team_id = team["id"].as_i64().unwrap();

    let base = json!({
        "title": "Trip",
        "eventType": "BUSINESS_TRIP",
        "startDate": "2025-06-10",
        "endDate": "2025-06-12",
        "teamId": team_id
    });

    for (field, value) in [
        ("title", json!("  ")),
        ("eventType", json!("PARTY")),
        ("startDate", json!("June 10th")),
        ("startDate", json!("2025-06-13")),
    ] {
        let mut body = base.clone();
        body[field] = value;
        let (status, err) = app
            .send(Method::POST, "/events", Some(&admin_token), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}: {err}");
        assert!(err["error"].is_string());
    }

    let (status, events) = app
        .send(Method::GET, "/events", Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(events["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_leaderboard_workflow() {
    let app = TestApp::new();
    let (_, a) = app.user("A00001", "A", Role::User, "APPROVED").await;
    let (_, b) = app.user("B00001", "B", Role::User, "APPROVED").await;
    let (_, c) = app.user("C00001", "C", Role::User, "APPROVED").await;
    let (_, d) = app.user("D00001", "D", Role::User, "APPROVED").await;

    for (token, score) in [(&a, 100.0), (&b, 80.0), (&c, 60.0)] {
        let (status, body) = app
            .send(
                Method::POST,
                "/games/scores",
                Some(token),
                Some(json!({"gameType": "tetris", "score": score})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["improved"], true);
        assert_eq!(body["message"], "Score saved");
    }

    let (status, body) = app
        .send(
            Method::POST,
            "/games/scores",
            Some(&b),
            Some(json!({"gameType": "tetris", "score": 70.0})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["improved"], false);
    assert_eq!(body["message"], "Score not improved");
    assert_eq!(body["score"]["score"], 80.0);

    let (status, board) = app
        .send(Method::GET, "/games/scores/tetris?limit=2", Some(&a), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["total"], 3);
    assert_eq!(board["limit"], 2);
    assert_eq!(board["rankings"][0]["userName"], "A");
    assert_eq!(board["rankings"][1]["rank"], 2);

    let (status, mine) = app
        .send(Method::GET, "/games/scores/tetris/my", Some(&b), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["rank"], 2);

    let (status, around) = app
        .send(Method::GET, "/games/scores/tetris/around-me", Some(&b), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(around["myRank"], 2);
    let names: Vec<_> = around["rankings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["userName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(around["rankings"][1]["isMe"], true);

    let (status, none) = app
        .send(Method::GET, "/games/scores/tetris/my", Some(&d), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(none["score"].is_null());
    assert!(none["rank"].is_null());

    let (status, _) = app
        .send(Method::GET, "/games/scores/chess", Some(&a), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_approval_and_lottery() {
    let app = TestApp::new();
    let (_, admin_token) = app.user("ADMIN1", "Admin", Role::Admin, "APPROVED").await;
    let (pending_id, pending_token) = app.user("P00001", "Newbie", Role::User, "PENDING").await;

    let (status, users) = app
        .send(
            Method::GET,
            "/users?status=PENDING",
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users["data"].as_array().unwrap().len(), 1);
    assert_eq!(users["data"][0]["employeeNumber"], "P00001");

    let (status, user) = app
        .send(
            Method::PATCH,
            &format!("/users/{pending_id}/status"),
            Some(&admin_token),
            Some(json!({"status": "APPROVED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["status"], "APPROVED");

    // The same token now passes the approval check
    let (status, draw) = app
        .send(
            Method::POST,
            "/lottery/draw",
            Some(&pending_token),
            Some(json!({"candidates": ["Kim", "Lee", " Kim ", "Park"], "count": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let winners = draw["winners"].as_array().unwrap();
    assert_eq!(winners.len(), 2);
    assert_ne!(winners[0], winners[1]);

    let (status, _) = app
        .send(
            Method::POST,
            "/lottery/draw",
            Some(&pending_token),
            Some(json!({"candidates": ["Kim"], "count": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
