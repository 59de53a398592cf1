use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    TextAnnotation,
    ImageAnnotation,
    VideoAnnotation,
}

/// One bank question. `options` is a JSON array of strings for mcq
/// questions; `correct_answer` is only meaningful for mcq and must never
/// be serialized into candidate-facing payloads (see `QuestionForTest`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub question_type: QuestionType,
    pub question_text: String,
    pub division_id: Option<Uuid>,
    pub options: Option<JsonValue>,
    pub correct_answer: Option<String>,
    pub media_url: Option<String>,
    pub marks: rust_decimal::Decimal,
    pub difficulty: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
