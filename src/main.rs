use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use assessment_backend::{
    config::Config, database::pool::create_pool, middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let cors = middleware::cors::cors_layer(&config.cors_allowed_origins);
    let server_address = config.server_address.clone();
    let app_state = AppState::new(pool, config);

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    let user_api = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/jobs", get(routes::jobs::list_jobs))
        .route("/api/jobs/:id/apply", post(routes::jobs::apply_for_job))
        .route("/api/jobs/my", get(routes::jobs::my_applications))
        .route("/api/jobs/stats", get(routes::jobs::job_stats))
        .route("/api/courses", get(routes::courses::list_courses))
        .route("/api/courses/enrolled", get(routes::courses::enrolled_courses))
        .route("/api/courses/stats", get(routes::courses::course_stats))
        .route("/api/assessments", get(routes::assessments::list_assessments))
        .route(
            "/api/assessments/company",
            get(routes::assessments::company_assessments),
        )
        .route("/api/assessments/badges", get(routes::assessments::my_badges))
        .route(
            "/api/assessments/stats",
            get(routes::assessments::assessment_stats),
        )
        .route("/api/tests/available", get(routes::tests::available_tests))
        .route("/api/tests/start", post(routes::tests::start_test))
        .route("/api/tests/submit-answer", post(routes::tests::submit_answer))
        .route(
            "/api/tests/complete/:attempt_id",
            post(routes::tests::complete_test),
        )
        .route(
            "/api/tests/flag-violation/:attempt_id",
            post(routes::tests::flag_violation),
        )
        .route("/api/tests/my-attempts", get(routes::tests::my_attempts))
        .route("/api/tests/result/:attempt_id", get(routes::tests::get_result))
        .route("/api/messages", get(routes::messages::inbox))
        .route("/api/messages/:id/read", post(routes::messages::mark_read))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::require_bearer_auth,
        ));

    let admin_api = Router::new()
        .route("/api/admin/stats", get(routes::admin::stats))
        .route(
            "/api/admin/divisions",
            get(routes::admin::list_divisions).post(routes::admin::create_division),
        )
        .route(
            "/api/admin/divisions/:id",
            put(routes::admin::update_division).delete(routes::admin::delete_division),
        )
        .route(
            "/api/admin/questions",
            get(routes::admin::list_questions).post(routes::admin::create_question),
        )
        .route(
            "/api/admin/questions/:id",
            put(routes::admin::update_question).delete(routes::admin::delete_question),
        )
        .route("/api/admin/tests", get(routes::admin::list_tests))
        .route("/api/admin/tests/generate", post(routes::admin::generate_test))
        .route("/api/admin/tests/:id", put(routes::admin::update_test))
        .route("/api/admin/tests/:id/publish", post(routes::admin::publish_test))
        .route("/api/admin/candidates", get(routes::admin::list_candidates))
        .route(
            "/api/admin/candidates/:id/profile",
            get(routes::admin::candidate_profile),
        )
        .route(
            "/api/admin/candidates/:id/approve",
            post(routes::admin::approve_candidate),
        )
        .route(
            "/api/admin/candidates/:id/reject",
            post(routes::admin::reject_candidate),
        )
        .route("/api/admin/attempts", get(routes::admin::list_attempts))
        .route("/api/admin/messages", post(routes::admin::send_message))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::require_admin,
        ));

    let app = base_routes
        .merge(user_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
