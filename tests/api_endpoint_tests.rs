//! API endpoint tests
//!
//! Each test drives the full router against an isolated database: auth
//! guards, status codes, response envelopes and error bodies.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use jobboard::api::create_router;
use jobboard::api::middleware::JwtService;
use jobboard::application::builder::ApplicationBuilder;
use jobboard::dto::UserDto;
use jobboard::Config;

const SECRET: &str = "api-test-secret";

fn test_config() -> Config {
    let mut config = Config::from_env();
    config.jwt_secret = SECRET.to_string();
    config.jwt_expiration_hours = 1;
    config.bcrypt_cost = 4;
    config.strict_filters = false;
    config.max_body_bytes = 64 * 1024;
    config
}

fn app(pool: PgPool) -> Router {
    let state = ApplicationBuilder::new(test_config())
        .with_pool(pool)
        .with_infrastructure()
        .unwrap()
        .build()
        .unwrap();
    create_router(state)
}

fn token_for(username: &str, is_admin: bool) -> String {
    let user = UserDto {
        username: username.to_string(),
        first_name: "F".to_string(),
        last_name: "L".to_string(),
        email: format!("{}@email.com", username),
        is_admin,
    };
    JwtService::new(SECRET, 1).encode_token(&user).unwrap()
}

fn admin() -> Option<String> {
    Some(token_for("u1", true))
}

fn plain_user() -> Option<String> {
    Some(token_for("u2", false))
}

/// Send a request and return status plus parsed JSON body
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<String>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(data) => builder
            .header("content-type", "application/json")
            .body(Body::from(data.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn assert_error(body: &Value, status: StatusCode) {
    assert_eq!(body["error"]["status"], status.as_u16());
    assert!(body["error"]["message"].is_string());
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn health_endpoints(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[sqlx::test]
async fn request_id_is_echoed(pool: PgPool) {
    let app = app(pool);
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[sqlx::test(fixtures("users"))]
async fn token_for_valid_credentials(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/token",
        None,
        Some(json!({"username": "u1", "password": "password1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let claims = JwtService::new(SECRET, 1)
        .decode_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.username, "u1");
    assert!(claims.is_admin);
}

#[sqlx::test(fixtures("users"))]
async fn token_rejects_bad_credentials(pool: PgPool) {
    let app = app(pool);

    for creds in [
        json!({"username": "u1", "password": "wrong"}),
        json!({"username": "nope", "password": "password1"}),
    ] {
        let (status, body) = send(&app, Method::POST, "/auth/token", None, Some(creds)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid username/password");
    }

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/token",
        None,
        Some(json!({"username": "u1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(fixtures("users"))]
async fn register_never_grants_admin(pool: PgPool) {
    let app = app(pool);
    let new_user = json!({
        "username": "new",
        "password": "password",
        "firstName": "first",
        "lastName": "last",
        "email": "new@email.com"
    });

    let (status, body) =
        send(&app, Method::POST, "/auth/register", None, Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let claims = JwtService::new(SECRET, 1)
        .decode_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.username, "new");
    assert!(!claims.is_admin);

    let (status, body) = send(&app, Method::POST, "/auth/register", None, Some(new_user)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Duplicate username: new");

    let mut sneaky = json!({
        "username": "sneaky",
        "password": "password",
        "firstName": "first",
        "lastName": "last",
        "email": "sneaky@email.com"
    });
    sneaky["isAdmin"] = json!(true);
    let (status, _) = send(&app, Method::POST, "/auth/register", None, Some(sneaky)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[sqlx::test(fixtures("companies", "jobs"))]
async fn create_company_requires_admin(pool: PgPool) {
    let app = app(pool);
    let new_company = json!({
        "handle": "new",
        "name": "New",
        "description": "DescNew",
        "numEmployees": 10,
        "logoUrl": "http://new.img"
    });

    for token in [None, plain_user()] {
        let (status, body) =
            send(&app, Method::POST, "/companies", token, Some(new_company.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({"error": {"message": "Unauthorized", "status": 401}})
        );
    }

    let (status, body) = send(&app, Method::POST, "/companies", admin(), Some(new_company)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["company"]["handle"], "new");
    assert_eq!(body["company"]["numEmployees"], 10);
}

#[sqlx::test(fixtures("companies", "jobs"))]
async fn list_companies_with_filters(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/companies", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["companies"].as_array().unwrap().len(), 3);

    let (_, body) = send(
        &app,
        Method::GET,
        "/companies?minEmployees=2&maxEmployees=2",
        None,
        None,
    )
    .await;
    let companies = body["companies"].as_array().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0]["handle"], "c2");

    let (status, body) = send(&app, Method::GET, "/companies?nameLike=c3", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let companies = body["companies"].as_array().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0]["handle"], "c3");

    // unknown keys are ignored by default
    let (status, body) = send(&app, Method::GET, "/companies?color=red", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["companies"].as_array().unwrap().len(), 3);
}

#[sqlx::test(fixtures("companies"))]
async fn list_companies_rejects_inverted_range(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(
        &app,
        Method::GET,
        "/companies?minEmployees=3&maxEmployees=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "minEmployees (3) cannot be greater than maxEmployees (1)"
    );

    let (status, body) = send(&app, Method::GET, "/companies?minEmployees=many", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, StatusCode::BAD_REQUEST);
}

#[sqlx::test(fixtures("companies", "jobs"))]
async fn get_company_includes_jobs(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/companies/c1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "C1");
    assert_eq!(
        body["company"]["jobs"],
        json!([{"id": 1, "title": "j1", "salary": 100000, "equity": "0.02"}])
    );

    let (status, body) = send(&app, Method::GET, "/companies/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No company: nope");
}

#[sqlx::test(fixtures("companies"))]
async fn patch_company(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/companies/c1",
        admin(),
        Some(json!({"name": "C1-new", "logoUrl": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "C1-new");
    assert_eq!(body["company"]["logoUrl"], Value::Null);
    assert_eq!(body["company"]["numEmployees"], 1);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/companies/c2",
        admin(),
        Some(json!({"numEmployees": 99, "name": "testCompany"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"]["name"], "testCompany");
    assert_eq!(body["company"]["numEmployees"], 99);

    let (status, body) = send(&app, Method::PATCH, "/companies/c1", admin(), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No data supplied for update");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/companies/c1",
        admin(),
        Some(json!({"handle": "c1-new"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/companies/c1",
        plain_user(),
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/companies/nope",
        admin(),
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(fixtures("companies", "jobs"))]
async fn delete_company(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, Method::DELETE, "/companies/c1", plain_user(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::DELETE, "/companies/c1", admin(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": "c1"}));

    let (status, _) = send(&app, Method::GET, "/jobs/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[sqlx::test(fixtures("companies", "jobs"))]
async fn create_job(pool: PgPool) {
    let app = app(pool);
    let new_job = json!({
        "title": "new",
        "salary": 10,
        "equity": "0.2",
        "companyHandle": "c1"
    });

    let (status, _) = send(&app, Method::POST, "/jobs", plain_user(), Some(new_job.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::POST, "/jobs", admin(), Some(new_job)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["job"]["id"], 4);
    assert_eq!(body["job"]["equity"], "0.2");
    assert_eq!(body["job"]["companyHandle"], "c1");

    let (status, body) = send(
        &app,
        Method::POST,
        "/jobs",
        admin(),
        Some(json!({"title": "x", "companyHandle": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No company: nope");

    let (status, _) = send(
        &app,
        Method::POST,
        "/jobs",
        admin(),
        Some(json!({"title": "x", "equity": "1.5", "companyHandle": "c1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(fixtures("companies", "jobs"))]
async fn list_jobs_with_filters(pool: PgPool) {
    let app = app(pool);

    let (_, body) = send(&app, Method::GET, "/jobs", None, None).await;
    assert_eq!(body["jobs"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, "/jobs?hasEquity=true", None, None).await;
    assert!(body.get("jobs").is_none());
    let titles: Vec<&str> = body["filteredJobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["j1", "j2"]);

    let (_, body) = send(
        &app,
        Method::GET,
        "/jobs?title=j&minSalary=90000",
        None,
        None,
    )
    .await;
    let titles: Vec<&str> = body["filteredJobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["j3", "j1"]);

    let (status, _) = send(&app, Method::GET, "/jobs?hasEquity=maybe", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(fixtures("companies", "jobs"))]
async fn get_patch_delete_job(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/jobs/2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "j2");

    let (status, body) = send(&app, Method::GET, "/jobs/abc", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "No job: abc");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/jobs/2",
        admin(),
        Some(json!({"salary": null, "title": "j2-new"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["salary"], Value::Null);
    assert_eq!(body["job"]["title"], "j2-new");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/jobs/2",
        admin(),
        Some(json!({"companyHandle": "c1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::DELETE, "/jobs/2", admin(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": "2"}));

    let (status, _) = send(&app, Method::DELETE, "/jobs/2", admin(), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(fixtures("users"))]
async fn admin_creates_user_with_token(pool: PgPool) {
    let app = app(pool);
    let new_user = json!({
        "username": "boss",
        "password": "password",
        "firstName": "B",
        "lastName": "O",
        "email": "boss@email.com",
        "isAdmin": true
    });

    let (status, _) = send(&app, Method::POST, "/users", plain_user(), Some(new_user.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::POST, "/users", admin(), Some(new_user)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "boss");
    assert_eq!(body["user"]["isAdmin"], true);
    assert!(body["token"].is_string());
}

#[sqlx::test(fixtures("users"))]
async fn list_users_admin_only(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, Method::GET, "/users", plain_user(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/users", admin(), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password").is_none()));
}

#[sqlx::test(fixtures("users"))]
async fn get_user_self_or_admin(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/users/u2", plain_user(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["firstName"], "U2F");

    let (status, _) = send(&app, Method::GET, "/users/u1", plain_user(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/users/u2", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/users/nope", admin(), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(fixtures("users"))]
async fn patch_user(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/u2",
        plain_user(),
        Some(json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/users/u2",
        plain_user(),
        Some(json!({"firstName": "New", "password": "new-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["firstName"], "New");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/token",
        None,
        Some(json!({"username": "u2", "password": "new-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/users/u2",
        admin(),
        Some(json!({"isAdmin": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isAdmin"], true);
}

#[sqlx::test(fixtures("users"))]
async fn delete_user(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, Method::DELETE, "/users/u1", plain_user(), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::DELETE, "/users/u2", plain_user(), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deleted": "u2"}));

    let (status, _) = send(&app, Method::DELETE, "/users/u2", admin(), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(fixtures("companies", "jobs", "users"))]
async fn auth_is_checked_before_body(pool: PgPool) {
    let app = app(pool);
    let bad_job = json!({"title": 5, "salary": 99999, "equity": "0.05", "companyHandle": "c1"});

    for token in [None, plain_user()] {
        let (status, body) = send(&app, Method::POST, "/jobs", token, Some(bad_job.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Unauthorized");
    }
    let (status, _) = send(&app, Method::POST, "/jobs", admin(), Some(bad_job)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/companies/c1",
        None,
        Some(json!({"handle": "c1-new"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/u1",
        plain_user(),
        Some(json!({"firstName": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/u2",
        plain_user(),
        Some(json!({"firstName": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn oversized_body_is_rejected(pool: PgPool) {
    let app = app(pool);
    let huge = "x".repeat(128 * 1024);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/token",
        None,
        Some(json!({"username": "u1", "password": huge})),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[sqlx::test]
async fn openapi_document_is_served(pool: PgPool) {
    let app = app(pool);

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Jobboard API");
}
