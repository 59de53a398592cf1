use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{
    AttemptFilter, CandidateProfileResponse, CreateDivisionRequest, CreateQuestionRequest,
    GenerateTestRequest, QuestionFilter, SendMessageRequest, SendMessageResponse,
    UpdateDivisionRequest, UpdateQuestionRequest, UpdateTestRequest,
};
use crate::dto::test_dto::TestAttemptResponse;
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.stats().await?;
    Ok(Json(stats))
}

// Divisions

#[axum::debug_handler]
pub async fn list_divisions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let divisions = state.admin_service.list_divisions().await?;
    Ok(Json(divisions))
}

#[axum::debug_handler]
pub async fn create_division(
    State(state): State<AppState>,
    Json(payload): Json<CreateDivisionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let division = state.admin_service.create_division(payload).await?;
    Ok(Json(division))
}

#[axum::debug_handler]
pub async fn update_division(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDivisionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let division = state.admin_service.update_division(id, payload).await?;
    Ok(Json(division))
}

#[axum::debug_handler]
pub async fn delete_division(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.admin_service.delete_division(id).await?;
    Ok(Json(json!({ "message": "Division deleted" })))
}

// Questions

#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse> {
    let questions = state.admin_service.list_questions(filter).await?;
    Ok(Json(questions))
}

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.admin_service.create_question(payload).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.admin_service.update_question(id, payload).await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.admin_service.delete_question(id).await?;
    Ok(Json(json!({ "message": "Question deleted" })))
}

// Tests

#[axum::debug_handler]
pub async fn list_tests(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let tests = state.admin_service.list_tests().await?;
    Ok(Json(tests))
}

#[axum::debug_handler]
pub async fn generate_test(
    State(state): State<AppState>,
    Json(payload): Json<GenerateTestRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let test = state.admin_service.generate_test(payload).await?;
    Ok(Json(test))
}

#[axum::debug_handler]
pub async fn update_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTestRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let test = state.admin_service.update_test(id, payload).await?;
    Ok(Json(test))
}

#[axum::debug_handler]
pub async fn publish_test(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.admin_service.publish_test(id).await?;
    Ok(Json(json!({ "message": "Test published" })))
}

// Candidates

#[axum::debug_handler]
pub async fn list_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let candidates = state.admin_service.list_candidates().await?;
    Ok(Json(candidates))
}

#[axum::debug_handler]
pub async fn candidate_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.admin_service.get_candidate(id).await?;
    let attempts = state.admin_service.attempts_for_user(id).await?;
    let messages = state.message_service.for_recipient(id).await?;

    let response = CandidateProfileResponse {
        user,
        test_attempts: attempts.into_iter().map(TestAttemptResponse::from).collect(),
        messages,
    };
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn approve_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.admin_service.set_approval(id, "approved").await?;
    Ok(Json(json!({ "message": "Candidate approved" })))
}

#[axum::debug_handler]
pub async fn reject_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.admin_service.set_approval(id, "rejected").await?;
    Ok(Json(json!({ "message": "Candidate rejected" })))
}

// Attempt review

#[axum::debug_handler]
pub async fn list_attempts(
    State(state): State<AppState>,
    Query(filter): Query<AttemptFilter>,
) -> Result<impl IntoResponse> {
    let rows = state.admin_service.list_attempts(filter.flagged_only).await?;
    let responses: Vec<TestAttemptResponse> =
        rows.into_iter().map(TestAttemptResponse::from).collect();
    Ok(Json(responses))
}

// Messaging

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let message = state
        .message_service
        .send(
            claims.user_id()?,
            payload.recipient_id,
            &payload.subject,
            &payload.content,
            payload.reason.as_deref(),
        )
        .await?;
    Ok(Json(SendMessageResponse {
        success: true,
        message_id: message.id,
    }))
}
