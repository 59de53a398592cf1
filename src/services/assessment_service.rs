use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::assessment_dto::AssessmentStats;
use crate::error::Result;
use crate::models::assessment::{Assessment, AssessmentAttempt, Badge};

#[derive(Clone)]
pub struct AssessmentService {
    pool: PgPool,
}

impl AssessmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<Assessment>> {
        let assessments = sqlx::query_as::<_, Assessment>(
            r#"SELECT * FROM assessments WHERE is_active = TRUE ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(assessments)
    }

    /// Company-branded assessments only.
    pub async fn list_company(&self) -> Result<Vec<Assessment>> {
        let assessments = sqlx::query_as::<_, Assessment>(
            r#"
            SELECT * FROM assessments
            WHERE is_active = TRUE AND company_name IS NOT NULL
            ORDER BY company_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(assessments)
    }

    pub async fn badges_for(&self, user_id: Uuid) -> Result<Vec<Badge>> {
        let badges = sqlx::query_as::<_, Badge>(
            r#"SELECT * FROM badges WHERE user_id = $1 ORDER BY earned_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(badges)
    }

    pub async fn stats_for(&self, user_id: Uuid) -> Result<AssessmentStats> {
        let attempts = sqlx::query_as::<_, AssessmentAttempt>(
            r#"SELECT * FROM assessment_attempts WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let badges = sqlx::query_as::<_, Badge>(r#"SELECT * FROM badges WHERE user_id = $1"#)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(AssessmentStats {
            tests_enrolled: attempts.len() as i64,
            tests_completed: attempts.iter().filter(|a| a.completed).count() as i64,
            badges: badges.iter().filter(|b| !b.is_super_badge).count() as i64,
            super_badges: badges.iter().filter(|b| b.is_super_badge).count() as i64,
        })
    }
}
