use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let courses = state.course_service.list_active().await?;
    Ok(Json(courses))
}

#[axum::debug_handler]
pub async fn enrolled_courses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let enrollments = state.course_service.enrolled_for(claims.user_id()?).await?;
    Ok(Json(enrollments))
}

#[axum::debug_handler]
pub async fn course_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let stats = state.course_service.stats_for(claims.user_id()?).await?;
    Ok(Json(stats))
}
