use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_assessments(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let assessments = state.assessment_service.list_active().await?;
    Ok(Json(assessments))
}

#[axum::debug_handler]
pub async fn company_assessments(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let assessments = state.assessment_service.list_company().await?;
    Ok(Json(assessments))
}

#[axum::debug_handler]
pub async fn my_badges(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let badges = state.assessment_service.badges_for(claims.user_id()?).await?;
    Ok(Json(badges))
}

#[axum::debug_handler]
pub async fn assessment_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let stats = state.assessment_service.stats_for(claims.user_id()?).await?;
    Ok(Json(stats))
}
