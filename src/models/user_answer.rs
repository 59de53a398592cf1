use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// One recorded response. At most one row exists per
/// `(attempt_id, question_id)`; resubmission overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAnswer {
    pub id: Uuid,
    pub attempt_id: Uuid,
    pub question_id: Uuid,
    pub answer_text: Option<String>,
    pub annotation_data: Option<JsonValue>,
    pub is_correct: Option<bool>,
    pub marks_obtained: rust_decimal::Decimal,
    pub time_spent_seconds: Option<i32>,
    pub answered_at: DateTime<Utc>,
}
