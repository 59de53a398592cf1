use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Attempt lifecycle. The only legal transition is
/// `InProgress -> Completed`; completion happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    TabSwitch,
    FullscreenExit,
    CopyPaste,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub test_id: Uuid,
    pub status: AttemptStatus,
    pub current_question: i32,
    pub score: rust_decimal::Decimal,
    pub total_marks: rust_decimal::Decimal,
    pub percentage: rust_decimal::Decimal,
    pub passed: Option<bool>,
    pub tab_switches: i32,
    pub fullscreen_exits: i32,
    pub is_flagged: bool,
    pub flag_reason: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub time_taken_seconds: Option<i32>,
}
