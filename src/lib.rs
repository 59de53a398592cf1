pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::{
    admin_service::AdminService, assessment_service::AssessmentService,
    attempt_service::AttemptService, auth_service::AuthService, course_service::CourseService,
    job_service::JobService, message_service::MessageService, test_service::TestService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub test_service: TestService,
    pub attempt_service: AttemptService,
    pub job_service: JobService,
    pub course_service: CourseService,
    pub assessment_service: AssessmentService,
    pub message_service: MessageService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let auth_service = AuthService::new(pool.clone());
        let test_service = TestService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());
        let job_service = JobService::new(pool.clone());
        let course_service = CourseService::new(pool.clone());
        let assessment_service = AssessmentService::new(pool.clone());
        let message_service = MessageService::new(pool.clone());
        let admin_service = AdminService::new(pool.clone());

        Self {
            pool,
            config: Arc::new(config),
            auth_service,
            test_service,
            attempt_service,
            job_service,
            course_service,
            assessment_service,
            message_service,
            admin_service,
        }
    }
}
