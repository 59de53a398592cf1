use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

use crate::dto::test_dto::TestAttemptResponse;
use crate::models::message::Message;
use crate::models::question::QuestionType;
use crate::models::user::User;

#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub total_candidates: i64,
    pub pending_candidates: i64,
    pub total_tests: i64,
    pub total_questions: i64,
    pub total_attempts: i64,
    pub flagged_attempts: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDivisionRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDivisionRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFilter {
    pub question_type: Option<QuestionType>,
    pub difficulty: Option<String>,
    pub division_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub question_type: QuestionType,
    #[validate(length(min = 1))]
    pub question_text: String,
    pub division_id: Option<Uuid>,
    pub options: Option<JsonValue>,
    pub correct_answer: Option<String>,
    pub media_url: Option<String>,
    pub marks: Decimal,
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1))]
    pub question_text: Option<String>,
    pub division_id: Option<Uuid>,
    pub options: Option<JsonValue>,
    pub correct_answer: Option<String>,
    pub media_url: Option<String>,
    pub marks: Option<Decimal>,
    pub difficulty: Option<String>,
}

/// Per-type section of a generated test.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub count: i32,
    #[serde(default)]
    pub marks_per_question: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateTestRequest {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
    pub duration_minutes: i32,
    pub passing_marks: Option<Decimal>,
    pub mcq: Option<SectionConfig>,
    pub text_annotation: Option<SectionConfig>,
    pub image_annotation: Option<SectionConfig>,
    pub video_annotation: Option<SectionConfig>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTestRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
    pub duration_minutes: Option<i32>,
    pub passing_marks: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttemptFilter {
    #[serde(default)]
    pub flagged_only: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfileResponse {
    #[serde(flatten)]
    pub user: User,
    pub test_attempts: Vec<TestAttemptResponse>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1))]
    pub subject: String,
    #[validate(length(min = 1))]
    pub content: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message_id: Uuid,
}
