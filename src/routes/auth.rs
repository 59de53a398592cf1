use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::error::Result;
use crate::middleware::auth::{create_access_token, Claims};
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.auth_service.register(payload).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .auth_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = create_access_token(
        &user,
        &state.config.jwt_secret,
        state.config.access_token_expire_minutes,
    )?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.get_user(claims.user_id()?).await?;
    Ok(Json(user))
}
