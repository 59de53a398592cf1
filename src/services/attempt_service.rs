use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::test_dto::{AnswerDetail, TestResultResponse};
use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::test::Test;
use crate::models::test_attempt::{AttemptStatus, TestAttempt, ViolationType};
use crate::models::user_answer::UserAnswer;
use crate::services::question_resolver;
use crate::services::scoring::ScoringService;
use crate::utils::time;

const TAB_SWITCH_FLAG_THRESHOLD: i32 = 3;
const FULLSCREEN_EXIT_FLAG_THRESHOLD: i32 = 2;

/// Applies one violation report to the attempt's counters. `copy_paste`
/// is a valid report but carries no counter or threshold; the request
/// still resolves successfully.
fn record_violation(attempt: &mut TestAttempt, violation_type: ViolationType) {
    match violation_type {
        ViolationType::TabSwitch => {
            attempt.tab_switches += 1;
            if attempt.tab_switches >= TAB_SWITCH_FLAG_THRESHOLD {
                attempt.is_flagged = true;
                attempt.flag_reason =
                    Some(format!("Multiple tab switches: {}", attempt.tab_switches));
            }
        }
        ViolationType::FullscreenExit => {
            attempt.fullscreen_exits += 1;
            if attempt.fullscreen_exits >= FULLSCREEN_EXIT_FLAG_THRESHOLD {
                attempt.is_flagged = true;
                attempt.flag_reason =
                    Some(format!("Multiple fullscreen exits: {}", attempt.fullscreen_exits));
            }
        }
        ViolationType::CopyPaste => {}
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AttemptWithTitle {
    #[sqlx(flatten)]
    pub attempt: TestAttempt,
    pub test_title: Option<String>,
}

/// The attempt session state machine. All state lives in
/// `test_attempts`/`user_answers`; every operation is one transaction
/// against the store, so counters and answers are never partially
/// visible to other requests.
#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start a test session, resuming any in-progress attempt for the
    /// same `(user, test)` pair instead of creating a duplicate.
    pub async fn start(
        &self,
        user_id: Uuid,
        test_id: Uuid,
    ) -> Result<(TestAttempt, Test, Vec<Question>)> {
        let test = sqlx::query_as::<_, Test>(
            r#"SELECT * FROM tests WHERE id = $1 AND is_active = TRUE AND is_published = TRUE"#,
        )
        .bind(test_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Test not found or not available".to_string()))?;

        let existing = sqlx::query_as::<_, TestAttempt>(
            r#"SELECT * FROM test_attempts WHERE user_id = $1 AND test_id = $2 AND status = $3"#,
        )
        .bind(user_id)
        .bind(test_id)
        .bind(AttemptStatus::InProgress)
        .fetch_optional(&self.pool)
        .await?;

        let attempt = match existing {
            Some(attempt) => {
                tracing::info!(attempt_id = %attempt.id, user_id = %user_id, "resuming attempt");
                attempt
            }
            None => {
                let attempt = sqlx::query_as::<_, TestAttempt>(
                    r#"
                    INSERT INTO test_attempts (user_id, test_id, total_marks)
                    VALUES ($1, $2, $3)
                    RETURNING *
                    "#,
                )
                .bind(user_id)
                .bind(test_id)
                .bind(test.total_marks)
                .fetch_one(&self.pool)
                .await?;
                tracing::info!(attempt_id = %attempt.id, user_id = %user_id, "attempt created");
                attempt
            }
        };

        let questions = question_resolver::resolve_question_set(&self.pool, &test).await?;
        Ok((attempt, test, questions))
    }

    /// Record an answer. One row per `(attempt, question)`: the first
    /// submission inserts and advances `current_question`, later ones
    /// overwrite in place. The auto-score is recomputed either way.
    pub async fn submit_answer(
        &self,
        user_id: Uuid,
        attempt_id: Uuid,
        question_id: Uuid,
        answer_text: Option<String>,
        annotation_data: Option<serde_json::Value>,
        time_spent_seconds: Option<i32>,
    ) -> Result<(Uuid, bool)> {
        let mut tx = self.pool.begin().await?;

        let attempt = sqlx::query_as::<_, TestAttempt>(
            r#"SELECT * FROM test_attempts WHERE id = $1 AND user_id = $2 AND status = $3"#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .bind(AttemptStatus::InProgress)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            Error::NotFound("Test attempt not found or already completed".to_string())
        })?;

        let question = sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = $1"#)
            .bind(question_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        let (is_correct, marks_obtained) =
            ScoringService::auto_score(&question, answer_text.as_deref());

        let existing = sqlx::query_as::<_, UserAnswer>(
            r#"SELECT * FROM user_answers WHERE attempt_id = $1 AND question_id = $2"#,
        )
        .bind(attempt_id)
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (answer_id, updated) = match existing {
            Some(answer) => {
                sqlx::query(
                    r#"
                    UPDATE user_answers
                    SET answer_text = $1, annotation_data = $2, time_spent_seconds = $3,
                        is_correct = $4, marks_obtained = $5, answered_at = NOW()
                    WHERE id = $6
                    "#,
                )
                .bind(&answer_text)
                .bind(&annotation_data)
                .bind(time_spent_seconds)
                .bind(is_correct)
                .bind(marks_obtained)
                .bind(answer.id)
                .execute(&mut *tx)
                .await?;
                (answer.id, true)
            }
            None => {
                let answer_id: Uuid = sqlx::query_scalar(
                    r#"
                    INSERT INTO user_answers (
                        attempt_id, question_id, answer_text, annotation_data,
                        is_correct, marks_obtained, time_spent_seconds
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING id
                    "#,
                )
                .bind(attempt_id)
                .bind(question_id)
                .bind(&answer_text)
                .bind(&annotation_data)
                .bind(is_correct)
                .bind(marks_obtained)
                .bind(time_spent_seconds)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(
                    r#"UPDATE test_attempts SET current_question = current_question + 1 WHERE id = $1"#,
                )
                .bind(attempt.id)
                .execute(&mut *tx)
                .await?;

                (answer_id, false)
            }
        };

        tx.commit().await?;
        Ok((answer_id, updated))
    }

    /// Record a proctoring violation and return the live counters.
    pub async fn flag_violation(
        &self,
        user_id: Uuid,
        attempt_id: Uuid,
        violation_type: ViolationType,
    ) -> Result<TestAttempt> {
        let mut tx = self.pool.begin().await?;

        let mut attempt = sqlx::query_as::<_, TestAttempt>(
            r#"SELECT * FROM test_attempts WHERE id = $1 AND user_id = $2 AND status = $3"#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .bind(AttemptStatus::InProgress)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Test attempt not found".to_string()))?;

        record_violation(&mut attempt, violation_type);

        sqlx::query(
            r#"
            UPDATE test_attempts
            SET tab_switches = $1, fullscreen_exits = $2, is_flagged = $3, flag_reason = $4
            WHERE id = $5
            "#,
        )
        .bind(attempt.tab_switches)
        .bind(attempt.fullscreen_exits)
        .bind(attempt.is_flagged)
        .bind(&attempt.flag_reason)
        .bind(attempt.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if attempt.is_flagged {
            tracing::warn!(
                attempt_id = %attempt.id,
                reason = attempt.flag_reason.as_deref().unwrap_or(""),
                "attempt flagged"
            );
        }
        Ok(attempt)
    }

    /// Finalize the attempt. Completion is not idempotent: a second call
    /// is an invalid-state error, never a silent no-op.
    pub async fn complete(&self, user_id: Uuid, attempt_id: Uuid) -> Result<TestResultResponse> {
        let mut tx = self.pool.begin().await?;

        let attempt = sqlx::query_as::<_, TestAttempt>(
            r#"SELECT * FROM test_attempts WHERE id = $1 AND user_id = $2"#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Test attempt not found".to_string()))?;

        if attempt.status == AttemptStatus::Completed {
            return Err(Error::InvalidState("Test already completed".to_string()));
        }

        let test = sqlx::query_as::<_, Test>(r#"SELECT * FROM tests WHERE id = $1"#)
            .bind(attempt.test_id)
            .fetch_optional(&mut *tx)
            .await?;

        let answers = sqlx::query_as::<_, UserAnswer>(
            r#"SELECT * FROM user_answers WHERE attempt_id = $1 ORDER BY answered_at ASC"#,
        )
        .bind(attempt_id)
        .fetch_all(&mut *tx)
        .await?;

        let test_total = test
            .as_ref()
            .map(|t| t.total_marks)
            .unwrap_or(rust_decimal::Decimal::ZERO);
        let summary = ScoringService::summarize(attempt.total_marks, test_total, &answers);

        let now = time::now();
        let time_taken = time::elapsed_seconds(attempt.started_at, now);

        let updated = sqlx::query_as::<_, TestAttempt>(
            r#"
            UPDATE test_attempts
            SET status = $1, score = $2, percentage = $3, passed = $4,
                completed_at = $5, time_taken_seconds = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(AttemptStatus::Completed)
        .bind(summary.score)
        .bind(summary.percentage)
        .bind(summary.passed)
        .bind(now)
        .bind(time_taken)
        .bind(attempt.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            attempt_id = %updated.id,
            score = %summary.score,
            percentage = %summary.percentage,
            passed = summary.passed,
            "attempt completed"
        );

        let breakdown = self.load_breakdown(&answers).await?;
        Ok(TestResultResponse {
            attempt_id: updated.id,
            test_id: updated.test_id,
            test_title: test.map(|t| t.title).unwrap_or_else(|| "Unknown".to_string()),
            score: summary.score,
            total_marks: summary.total_marks,
            percentage: summary.percentage,
            passed: summary.passed,
            time_taken_seconds: updated.time_taken_seconds.unwrap_or(0),
            completed_at: updated.completed_at,
            answers: breakdown,
        })
    }

    /// Detailed result for a completed attempt. An attempt still in
    /// progress reads as not found.
    pub async fn get_result(&self, user_id: Uuid, attempt_id: Uuid) -> Result<TestResultResponse> {
        let attempt = sqlx::query_as::<_, TestAttempt>(
            r#"SELECT * FROM test_attempts WHERE id = $1 AND user_id = $2 AND status = $3"#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .bind(AttemptStatus::Completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Test result not found".to_string()))?;

        let test = sqlx::query_as::<_, Test>(r#"SELECT * FROM tests WHERE id = $1"#)
            .bind(attempt.test_id)
            .fetch_optional(&self.pool)
            .await?;

        let answers = sqlx::query_as::<_, UserAnswer>(
            r#"SELECT * FROM user_answers WHERE attempt_id = $1 ORDER BY answered_at ASC"#,
        )
        .bind(attempt_id)
        .fetch_all(&self.pool)
        .await?;

        let breakdown = self.load_breakdown(&answers).await?;
        Ok(TestResultResponse {
            attempt_id: attempt.id,
            test_id: attempt.test_id,
            test_title: test.map(|t| t.title).unwrap_or_else(|| "Unknown".to_string()),
            score: attempt.score,
            total_marks: attempt.total_marks,
            percentage: attempt.percentage,
            passed: attempt.passed.unwrap_or(false),
            time_taken_seconds: attempt.time_taken_seconds.unwrap_or(0),
            completed_at: attempt.completed_at,
            answers: breakdown,
        })
    }

    pub async fn my_attempts(&self, user_id: Uuid) -> Result<Vec<AttemptWithTitle>> {
        let rows = sqlx::query_as::<_, AttemptWithTitle>(
            r#"
            SELECT ta.*, t.title AS test_title
            FROM test_attempts ta
            LEFT JOIN tests t ON t.id = ta.test_id
            WHERE ta.user_id = $1
            ORDER BY ta.started_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn load_breakdown(&self, answers: &[UserAnswer]) -> Result<Vec<AnswerDetail>> {
        let ids: Vec<Uuid> = answers.iter().map(|a| a.question_id).collect();
        let questions =
            sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = ANY($1)"#)
                .bind(&ids)
                .fetch_all(&self.pool)
                .await?;
        let by_id: HashMap<Uuid, Question> =
            questions.into_iter().map(|q| (q.id, q)).collect();
        Ok(ScoringService::build_breakdown(answers, &by_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn attempt() -> TestAttempt {
        TestAttempt {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            test_id: Uuid::new_v4(),
            status: AttemptStatus::InProgress,
            current_question: 0,
            score: Decimal::ZERO,
            total_marks: Decimal::from(10),
            percentage: Decimal::ZERO,
            passed: None,
            tab_switches: 0,
            fullscreen_exits: 0,
            is_flagged: false,
            flag_reason: None,
            started_at: Utc::now(),
            completed_at: None,
            time_taken_seconds: None,
        }
    }

    #[test]
    fn two_tab_switches_do_not_flag() {
        let mut a = attempt();
        record_violation(&mut a, ViolationType::TabSwitch);
        record_violation(&mut a, ViolationType::TabSwitch);
        assert_eq!(a.tab_switches, 2);
        assert!(!a.is_flagged);
        assert!(a.flag_reason.is_none());
    }

    #[test]
    fn third_tab_switch_flags_with_reason() {
        let mut a = attempt();
        for _ in 0..3 {
            record_violation(&mut a, ViolationType::TabSwitch);
        }
        assert_eq!(a.tab_switches, 3);
        assert!(a.is_flagged);
        assert_eq!(a.flag_reason.as_deref(), Some("Multiple tab switches: 3"));
    }

    #[test]
    fn flag_reason_tracks_latest_count() {
        let mut a = attempt();
        for _ in 0..5 {
            record_violation(&mut a, ViolationType::TabSwitch);
        }
        assert_eq!(a.flag_reason.as_deref(), Some("Multiple tab switches: 5"));
    }

    #[test]
    fn one_fullscreen_exit_does_not_flag() {
        let mut a = attempt();
        record_violation(&mut a, ViolationType::FullscreenExit);
        assert_eq!(a.fullscreen_exits, 1);
        assert!(!a.is_flagged);
    }

    #[test]
    fn second_fullscreen_exit_flags() {
        let mut a = attempt();
        record_violation(&mut a, ViolationType::FullscreenExit);
        record_violation(&mut a, ViolationType::FullscreenExit);
        assert!(a.is_flagged);
        assert_eq!(a.flag_reason.as_deref(), Some("Multiple fullscreen exits: 2"));
    }

    #[test]
    fn copy_paste_is_accepted_but_not_counted() {
        let mut a = attempt();
        for _ in 0..10 {
            record_violation(&mut a, ViolationType::CopyPaste);
        }
        assert_eq!(a.tab_switches, 0);
        assert_eq!(a.fullscreen_exits, 0);
        assert!(!a.is_flagged);
    }
}
