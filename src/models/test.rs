use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::question::QuestionType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Test {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
    pub duration_minutes: i32,
    pub total_questions: i32,
    pub total_marks: rust_decimal::Decimal,
    pub passing_marks: rust_decimal::Decimal,
    pub mcq_count: i32,
    pub text_annotation_count: i32,
    pub image_annotation_count: i32,
    pub video_annotation_count: i32,
    pub is_published: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Test {
    /// Desired question counts per type, in delivery order.
    pub fn composition(&self) -> [(QuestionType, i32); 4] {
        [
            (QuestionType::Mcq, self.mcq_count),
            (QuestionType::TextAnnotation, self.text_annotation_count),
            (QuestionType::ImageAnnotation, self.image_annotation_count),
            (QuestionType::VideoAnnotation, self.video_annotation_count),
        ]
    }
}

/// Explicit link between a test and a bank question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestQuestion {
    pub id: Uuid,
    pub test_id: Uuid,
    pub question_id: Uuid,
    pub position: i32,
}
