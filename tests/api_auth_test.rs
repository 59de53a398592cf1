use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use assessment_backend::config::Config;
use assessment_backend::middleware;
use assessment_backend::middleware::auth::create_access_token;
use assessment_backend::models::user::{User, UserRole};
use assessment_backend::routes;
use assessment_backend::AppState;

const JWT_SECRET: &str = "test_secret_key";

fn test_state() -> AppState {
    let config = Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url: "postgres://localhost:5432/assessment_portal_test".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        access_token_expire_minutes: 60,
        cors_allowed_origins: Vec::new(),
    };
    // Lazy pool: auth gating is decided before any query runs, so these
    // tests never need a live database.
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    AppState::new(pool, config)
}

fn app(state: AppState) -> Router {
    let user_api = Router::new()
        .route("/api/tests/available", get(routes::tests::available_tests))
        .route(
            "/api/tests/flag-violation/:attempt_id",
            post(routes::tests::flag_violation),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_bearer_auth,
        ));
    let admin_api = Router::new()
        .route("/api/admin/stats", get(routes::admin::stats))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ));
    Router::new()
        .route("/health", get(routes::health::health))
        .merge(user_api)
        .merge(admin_api)
        .with_state(state)
}

fn user_with_role(role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        email: "testuser@example.com".to_string(),
        name: "Test User".to_string(),
        registration_number: "TEST001".to_string(),
        hashed_password: "unused".to_string(),
        role,
        degree: None,
        branch: None,
        batch: None,
        college: None,
        approval_status: "approved".to_string(),
        is_active: true,
        created_at: Utc::now(),
    }
}

fn bearer(role: UserRole) -> String {
    let token = create_access_token(&user_with_role(role), JWT_SECRET, 60).expect("token");
    format!("Bearer {}", token)
}

#[tokio::test]
async fn health_needs_no_auth() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/tests/available")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/tests/available")
                .header("Authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/tests/available")
                .header("Authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let app = app(test_state());
    let token =
        create_access_token(&user_with_role(UserRole::Student), "another_secret", 60).unwrap();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/tests/available")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn student_token_cannot_reach_admin_routes() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header("Authorization", bearer(UserRole::Student))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_token_passes_the_role_gate() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/stats")
                .header("Authorization", bearer(UserRole::Admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_violation_type_is_a_bad_request() {
    let app = app(test_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/tests/flag-violation/{}?violation_type=screenshot",
                    Uuid::new_v4()
                ))
                .header("Authorization", bearer(UserRole::Student))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
