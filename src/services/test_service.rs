use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::test_dto::AvailableTestResponse;
use crate::models::test::Test;
use crate::models::test_attempt::TestAttempt;
use crate::error::Result;

/// Read-side catalog over published tests.
#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Published tests annotated with the caller's most recent attempt.
    pub async fn available_for(&self, user_id: Uuid) -> Result<Vec<AvailableTestResponse>> {
        let tests = sqlx::query_as::<_, Test>(
            r#"
            SELECT * FROM tests
            WHERE is_active = TRUE AND is_published = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let latest_attempts = sqlx::query_as::<_, TestAttempt>(
            r#"
            SELECT DISTINCT ON (test_id) *
            FROM test_attempts
            WHERE user_id = $1
            ORDER BY test_id, started_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let by_test: HashMap<Uuid, TestAttempt> = latest_attempts
            .into_iter()
            .map(|a| (a.test_id, a))
            .collect();

        Ok(tests
            .into_iter()
            .map(|test| {
                let attempt = by_test.get(&test.id);
                AvailableTestResponse {
                    id: test.id,
                    title: test.title,
                    description: test.description,
                    duration_minutes: test.duration_minutes,
                    total_questions: test.total_questions,
                    total_marks: test.total_marks,
                    has_attempted: attempt.is_some(),
                    attempt_status: attempt.map(|a| a.status),
                    last_score: attempt.map(|a| a.score),
                    last_percentage: attempt.map(|a| a.percentage),
                }
            })
            .collect())
    }
}
