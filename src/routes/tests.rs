use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::test_dto::{
    FlagViolationQuery, QuestionForTest, StartTestRequest, SubmitAnswerQuery,
    SubmitAnswerRequest, SubmitAnswerResponse, TestAttemptResponse, TestSessionResponse,
    ViolationResponse,
};
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/tests/available",
    responses(
        (status = 200, description = "Published tests with the caller's latest attempt status"),
        (status = 401, description = "Missing or invalid token")
    )
)]
#[axum::debug_handler]
pub async fn available_tests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let tests = state.test_service.available_for(claims.user_id()?).await?;
    Ok(Json(tests))
}

#[utoipa::path(
    post,
    path = "/api/tests/start",
    responses(
        (status = 200, description = "Session created or resumed; questions carry no correct answers"),
        (status = 404, description = "Test not found or not available")
    )
)]
#[axum::debug_handler]
pub async fn start_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StartTestRequest>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let (attempt, test, questions) = state
        .attempt_service
        .start(user_id, payload.test_id)
        .await?;

    let questions: Vec<QuestionForTest> =
        questions.into_iter().map(QuestionForTest::from).collect();
    let response = TestSessionResponse {
        attempt_id: attempt.id,
        test_id: test.id,
        test_title: test.title,
        duration_minutes: test.duration_minutes,
        total_questions: questions.len(),
        questions,
        started_at: attempt.started_at,
    };
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<SubmitAnswerQuery>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user_id = claims.user_id()?;
    let (answer_id, updated) = state
        .attempt_service
        .submit_answer(
            user_id,
            query.attempt_id,
            payload.question_id,
            payload.answer_text,
            payload.annotation_data,
            payload.time_spent_seconds,
        )
        .await?;

    let message = if updated {
        "Answer updated"
    } else {
        "Answer submitted"
    };
    Ok(Json(SubmitAnswerResponse {
        message: message.to_string(),
        answer_id,
    }))
}

#[axum::debug_handler]
pub async fn complete_test(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .attempt_service
        .complete(claims.user_id()?, attempt_id)
        .await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn flag_violation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
    Query(query): Query<FlagViolationQuery>,
) -> Result<impl IntoResponse> {
    let attempt = state
        .attempt_service
        .flag_violation(claims.user_id()?, attempt_id, query.violation_type)
        .await?;
    Ok(Json(ViolationResponse::from(&attempt)))
}

#[axum::debug_handler]
pub async fn my_attempts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let rows = state.attempt_service.my_attempts(claims.user_id()?).await?;
    let responses: Vec<TestAttemptResponse> =
        rows.into_iter().map(TestAttemptResponse::from).collect();
    Ok(Json(responses))
}

#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state
        .attempt_service
        .get_result(claims.user_id()?, attempt_id)
        .await?;
    Ok(Json(result))
}
