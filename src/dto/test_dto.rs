use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

use crate::models::question::{Question, QuestionType};
use crate::models::test_attempt::{AttemptStatus, TestAttempt, ViolationType};

#[derive(Debug, Clone, Deserialize)]
pub struct StartTestRequest {
    pub test_id: Uuid,
}

/// Candidate-facing question. Built from `Question` by dropping
/// `correct_answer`; the field does not exist here, so it cannot leak
/// through serialization.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionForTest {
    pub id: Uuid,
    pub question_type: QuestionType,
    pub question_text: String,
    pub options: Option<JsonValue>,
    pub media_url: Option<String>,
    pub marks: Decimal,
}

impl From<Question> for QuestionForTest {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_type: q.question_type,
            question_text: q.question_text,
            options: q.options,
            media_url: q.media_url,
            marks: q.marks,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TestSessionResponse {
    pub attempt_id: Uuid,
    pub test_id: Uuid,
    pub test_title: String,
    pub duration_minutes: i32,
    pub total_questions: usize,
    pub questions: Vec<QuestionForTest>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerQuery {
    pub attempt_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,
    pub answer_text: Option<String>,
    pub annotation_data: Option<JsonValue>,
    #[validate(range(min = 0))]
    pub time_spent_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub message: String,
    pub answer_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlagViolationQuery {
    pub violation_type: ViolationType,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViolationResponse {
    pub tab_switches: i32,
    pub fullscreen_exits: i32,
    pub is_flagged: bool,
}

impl From<&TestAttempt> for ViolationResponse {
    fn from(attempt: &TestAttempt) -> Self {
        Self {
            tab_switches: attempt.tab_switches,
            fullscreen_exits: attempt.fullscreen_exits,
            is_flagged: attempt.is_flagged,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableTestResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub total_questions: i32,
    pub total_marks: Decimal,
    pub has_attempted: bool,
    pub attempt_status: Option<AttemptStatus>,
    pub last_score: Option<Decimal>,
    pub last_percentage: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestAttemptResponse {
    pub id: Uuid,
    pub test_id: Uuid,
    pub test_title: Option<String>,
    pub status: AttemptStatus,
    pub current_question: i32,
    pub score: Decimal,
    pub total_marks: Decimal,
    pub percentage: Decimal,
    pub passed: Option<bool>,
    pub tab_switches: i32,
    pub is_flagged: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_taken_seconds: Option<i32>,
}

impl From<crate::services::attempt_service::AttemptWithTitle> for TestAttemptResponse {
    fn from(row: crate::services::attempt_service::AttemptWithTitle) -> Self {
        let attempt = row.attempt;
        Self {
            id: attempt.id,
            test_id: attempt.test_id,
            test_title: row.test_title,
            status: attempt.status,
            current_question: attempt.current_question,
            score: attempt.score,
            total_marks: attempt.total_marks,
            percentage: attempt.percentage,
            passed: attempt.passed,
            tab_switches: attempt.tab_switches,
            is_flagged: attempt.is_flagged,
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
            time_taken_seconds: attempt.time_taken_seconds,
        }
    }
}

/// Per-question line in a result payload. Tolerant of a deleted
/// question: text defaults to empty, correct answer to null, max marks
/// to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerDetail {
    pub question_id: Uuid,
    pub question_text: String,
    pub user_answer: Option<String>,
    pub correct_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub marks_obtained: Decimal,
    pub max_marks: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestResultResponse {
    pub attempt_id: Uuid,
    pub test_id: Uuid,
    pub test_title: String,
    pub score: Decimal,
    pub total_marks: Decimal,
    pub percentage: Decimal,
    pub passed: bool,
    pub time_taken_seconds: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub answers: Vec<AnswerDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mcq_question() -> Question {
        Question {
            id: Uuid::new_v4(),
            question_type: QuestionType::Mcq,
            question_text: "What is 2 + 2?".to_string(),
            division_id: None,
            options: Some(serde_json::json!(["3", "4", "5", "6"])),
            correct_answer: Some("4".to_string()),
            media_url: None,
            marks: Decimal::from(1),
            difficulty: Some("easy".to_string()),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn question_for_test_never_carries_correct_answer() {
        let public = QuestionForTest::from(mcq_question());
        let value = serde_json::to_value(&public).unwrap();
        assert!(value.get("correct_answer").is_none());
        assert_eq!(value["question_type"], "mcq");
        assert_eq!(value["options"], serde_json::json!(["3", "4", "5", "6"]));
    }

    #[test]
    fn violation_type_parses_from_snake_case() {
        let parsed: ViolationType = serde_json::from_str("\"fullscreen_exit\"").unwrap();
        assert_eq!(parsed, ViolationType::FullscreenExit);
        assert!(serde_json::from_str::<ViolationType>("\"screenshot\"").is_err());
    }
}
