//! Handler tests for the Users domain
//!
//! These run the users router in isolation, backed by the in-memory
//! repository and broker:
//! - Request deserialization and validation
//! - Status codes and error bodies
//! - Token and role checks on protected routes

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_users::*;
use http_body_util::BodyExt;
use message_queue::InMemoryBroker;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

const QUEUE: &str = "users-created";

struct TestApp {
    router: Router,
    auth: JwtAuth,
    broker: InMemoryBroker,
    service: UserService<InMemoryUserRepository>,
}

impl TestApp {
    fn new() -> Self {
        let auth = JwtAuth::new(&JwtConfig::new("users-handler-test-secret-long-enough"));
        let broker = InMemoryBroker::new();
        let service = UserService::new(Arc::new(InMemoryUserRepository::new()));
        let producer = BulkRegistrationProducer::new(Arc::new(broker.clone()), QUEUE);
        let router = handlers::router(service.clone(), producer, auth.clone());

        Self {
            router,
            auth,
            broker,
            service,
        }
    }

    fn token(&self, role: Role) -> String {
        self.auth
            .issue(
                &uuid::Uuid::now_v7().to_string(),
                "caller@example.com",
                "Caller",
                &[role.to_string()],
            )
            .unwrap()
            .token
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn signup_body(builder: &TestDataBuilder, local: &str) -> Value {
    json!({
        "name": builder.name("user", local),
        "email": builder.email(local),
        "password": builder.password(),
        "tax_id": "123.456.789-09",
        "birth_date": "2003-06-02"
    })
}

#[tokio::test]
async fn test_create_user_returns_201_without_password_hash() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_create_201");

    let (status, body) = app
        .send(json_request("POST", "/", None, signup_body(&builder, "ana")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], builder.email("ana"));
    assert_eq!(body["role"], "User");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_rejects_weak_password() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_weak_password");
    let mut body = signup_body(&builder, "ana");
    body["password"] = json!("password");

    let (status, body) = app.send(json_request("POST", "/", None, body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("special character"));
}

#[tokio::test]
async fn test_create_user_rejects_malformed_email() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_bad_email");
    let mut body = signup_body(&builder, "ana");
    body["email"] = json!("not-an-email");

    let (status, _) = app.send(json_request("POST", "/", None, body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_duplicate_email_returns_409() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_duplicate");

    let (first, _) = app
        .send(json_request("POST", "/", None, signup_body(&builder, "ana")))
        .await;
    let (second, _) = app
        .send(json_request("POST", "/", None, signup_body(&builder, "ana")))
        .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_login");
    app.send(json_request("POST", "/", None, signup_body(&builder, "ana")))
        .await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/login",
            None,
            json!({ "email": builder.email("ana"), "password": builder.password() }),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    let claims = app.auth.verify(body["access_token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.email, builder.email("ana"));
    assert!(claims.has_role("User"));
}

#[tokio::test]
async fn test_login_with_wrong_password_returns_401() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_login_401");
    app.send(json_request("POST", "/", None, signup_body(&builder, "ana")))
        .await;

    let (status, _) = app
        .send(json_request(
            "POST",
            "/login",
            None,
            json!({ "email": builder.email("ana"), "password": "Wr0ng-password" }),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = TestApp::new();

    let (status, _) = app.send(empty_request("GET", "/", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request("POST", "/bulk", None, json!([])))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbid_regular_users() {
    let app = TestApp::new();
    let token = app.token(Role::User);

    let (status, _) = app.send(empty_request("GET", "/", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_can_list_get_update_and_delete() {
    let app = TestApp::new();
    let builder = TestDataBuilder::from_test_name("users_admin_crud");
    let token = app.token(Role::Admin);

    let (_, created) = app
        .send(json_request("POST", "/", None, signup_body(&builder, "ana")))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = app.send(empty_request("GET", "/", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, fetched) = app
        .send(empty_request("GET", &format!("/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let (status, updated) = app
        .send(json_request(
            "PUT",
            &format!("/{id}"),
            Some(&token),
            json!({ "name": "Ana Maria", "role": "Admin" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana Maria");
    assert_eq!(updated["role"], "Admin");

    let (status, _) = app
        .send(empty_request("DELETE", &format!("/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .send(empty_request("GET", &format!("/{id}"), Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_user_with_invalid_uuid_returns_400() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, _) = app
        .send(empty_request("GET", "/not-a-uuid", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_returns_summary_and_queues_valid_candidates() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/bulk",
            Some(&token),
            json!([
                { "name": "A", "email": "a@b.com", "password": "Passw0rd!", "taxId": "1", "role": "User" },
                { "name": "B", "email": "bad", "password": "x" }
            ]),
        ))
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({ "published": 1, "skipped": 1 }));
    assert_eq!(app.broker.published(QUEUE).len(), 1);

    // Nothing is persisted until the consumer runs
    assert!(app.service.list_users(UserFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_skips_records_without_name_or_password() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/bulk",
            Some(&token),
            json!([
                { "email": "a@b.com", "password": "Passw0rd!" },
                { "email": "bad", "password": "x" }
            ]),
        ))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({ "published": 1, "skipped": 1 }));

    let (status, body) = app
        .send(json_request(
            "POST",
            "/bulk",
            Some(&token),
            json!([
                { "name": "C", "email": "c@d.com", "password": "Passw0rd!" },
                { "name": "D", "email": "d@e.com" }
            ]),
        ))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({ "published": 1, "skipped": 1 }));

    let published = app.broker.published(QUEUE);
    assert_eq!(published.len(), 2);
    let first = codec::decode(&published[0]).unwrap();
    assert_eq!(first.email, "a@b.com");
    assert_eq!(first.name, "");
}

#[tokio::test]
async fn test_bulk_rejects_non_array_body_with_error_body() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/bulk",
            Some(&token),
            json!({ "email": "a@b.com", "password": "Passw0rd!" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INVALID_JSON");
    assert!(body["code"].is_number());
    assert!(body["message"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/bulk")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from("[{"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_JSON");

    assert!(app.broker.published(QUEUE).is_empty());
}

#[tokio::test]
async fn test_bulk_returns_503_when_queue_is_down() {
    let app = TestApp::new();
    let token = app.token(Role::Admin);
    app.broker.set_available(false);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/bulk",
            Some(&token),
            json!([{ "name": "A", "email": "a@b.com", "password": "Passw0rd!" }]),
        ))
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
}
