use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::admin_dto::{
    AdminStats, CreateDivisionRequest, CreateQuestionRequest, GenerateTestRequest,
    QuestionFilter, SectionConfig, UpdateDivisionRequest, UpdateQuestionRequest,
    UpdateTestRequest,
};
use crate::error::{Error, Result};
use crate::models::division::Division;
use crate::models::question::Question;
use crate::models::test::Test;
use crate::models::user::{User, UserRole};
use crate::services::attempt_service::AttemptWithTitle;

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        let total_candidates: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM users WHERE role = $1"#)
                .bind(UserRole::Student)
                .fetch_one(&self.pool)
                .await?;
        let pending_candidates: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM users WHERE role = $1 AND approval_status = 'pending'"#,
        )
        .bind(UserRole::Student)
        .fetch_one(&self.pool)
        .await?;
        let total_tests: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM tests"#)
            .fetch_one(&self.pool)
            .await?;
        let total_questions: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM questions"#)
            .fetch_one(&self.pool)
            .await?;
        let total_attempts: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM test_attempts"#)
            .fetch_one(&self.pool)
            .await?;
        let flagged_attempts: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM test_attempts WHERE is_flagged = TRUE"#)
                .fetch_one(&self.pool)
                .await?;

        Ok(AdminStats {
            total_candidates,
            pending_candidates,
            total_tests,
            total_questions,
            total_attempts,
            flagged_attempts,
        })
    }

    // Divisions

    pub async fn list_divisions(&self) -> Result<Vec<Division>> {
        let divisions =
            sqlx::query_as::<_, Division>(r#"SELECT * FROM divisions ORDER BY name ASC"#)
                .fetch_all(&self.pool)
                .await?;
        Ok(divisions)
    }

    pub async fn create_division(&self, req: CreateDivisionRequest) -> Result<Division> {
        let division = sqlx::query_as::<_, Division>(
            r#"INSERT INTO divisions (name, description) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(division)
    }

    pub async fn update_division(&self, id: Uuid, req: UpdateDivisionRequest) -> Result<Division> {
        let division = sqlx::query_as::<_, Division>(
            r#"
            UPDATE divisions
            SET name = COALESCE($2, name),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(&req.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Division not found".to_string()))?;
        Ok(division)
    }

    pub async fn delete_division(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"UPDATE divisions SET is_active = FALSE WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Division not found".to_string()));
        }
        Ok(())
    }

    // Questions

    pub async fn list_questions(&self, filter: QuestionFilter) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT * FROM questions
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR question_type = $1)
              AND ($2::text IS NULL OR difficulty = $2)
              AND ($3::uuid IS NULL OR division_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.question_type)
        .bind(filter.difficulty)
        .bind(filter.division_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    pub async fn create_question(&self, req: CreateQuestionRequest) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (
                question_type, question_text, division_id, options,
                correct_answer, media_url, marks, difficulty
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(req.question_type)
        .bind(&req.question_text)
        .bind(req.division_id)
        .bind(&req.options)
        .bind(&req.correct_answer)
        .bind(&req.media_url)
        .bind(req.marks)
        .bind(&req.difficulty)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn update_question(&self, id: Uuid, req: UpdateQuestionRequest) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET question_text = COALESCE($2, question_text),
                division_id = COALESCE($3, division_id),
                options = COALESCE($4, options),
                correct_answer = COALESCE($5, correct_answer),
                media_url = COALESCE($6, media_url),
                marks = COALESCE($7, marks),
                difficulty = COALESCE($8, difficulty)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.question_text)
        .bind(req.division_id)
        .bind(&req.options)
        .bind(&req.correct_answer)
        .bind(&req.media_url)
        .bind(req.marks)
        .bind(&req.difficulty)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;
        Ok(question)
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"UPDATE questions SET is_active = FALSE WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    // Tests

    pub async fn list_tests(&self) -> Result<Vec<Test>> {
        let tests = sqlx::query_as::<_, Test>(
            r#"SELECT * FROM tests WHERE is_active = TRUE ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    /// Create a test from a composition payload. Totals are derived from
    /// the enabled sections; the passing mark defaults to half the total.
    pub async fn generate_test(&self, req: GenerateTestRequest) -> Result<Test> {
        let mcq = section_counts(&req.mcq);
        let text = section_counts(&req.text_annotation);
        let image = section_counts(&req.image_annotation);
        let video = section_counts(&req.video_annotation);

        let total_questions = mcq.0 + text.0 + image.0 + video.0;
        let total_marks = mcq.1 + text.1 + image.1 + video.1;
        let passing_marks = req
            .passing_marks
            .unwrap_or_else(|| total_marks / Decimal::from(2));

        let test = sqlx::query_as::<_, Test>(
            r#"
            INSERT INTO tests (
                title, description, division_id, duration_minutes,
                total_questions, total_marks, passing_marks,
                mcq_count, text_annotation_count, image_annotation_count,
                video_annotation_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.division_id)
        .bind(req.duration_minutes)
        .bind(total_questions)
        .bind(total_marks)
        .bind(passing_marks)
        .bind(mcq.0)
        .bind(text.0)
        .bind(image.0)
        .bind(video.0)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(test_id = %test.id, title = %test.title, "test generated");
        Ok(test)
    }

    pub async fn update_test(&self, id: Uuid, req: UpdateTestRequest) -> Result<Test> {
        let test = sqlx::query_as::<_, Test>(
            r#"
            UPDATE tests
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                division_id = COALESCE($4, division_id),
                duration_minutes = COALESCE($5, duration_minutes),
                passing_marks = COALESCE($6, passing_marks),
                is_active = COALESCE($7, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.division_id)
        .bind(req.duration_minutes)
        .bind(req.passing_marks)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Test not found".to_string()))?;
        Ok(test)
    }

    pub async fn publish_test(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(r#"UPDATE tests SET is_published = TRUE WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Test not found".to_string()));
        }
        Ok(())
    }

    // Candidates

    pub async fn list_candidates(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC"#,
        )
        .bind(UserRole::Student)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn get_candidate(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1 AND role = $2"#)
            .bind(id)
            .bind(UserRole::Student)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }

    pub async fn set_approval(&self, id: Uuid, status: &str) -> Result<()> {
        let result = sqlx::query(
            r#"UPDATE users SET approval_status = $2 WHERE id = $1 AND role = $3"#,
        )
        .bind(id)
        .bind(status)
        .bind(UserRole::Student)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }
        Ok(())
    }

    // Attempt review

    pub async fn list_attempts(&self, flagged_only: bool) -> Result<Vec<AttemptWithTitle>> {
        let rows = sqlx::query_as::<_, AttemptWithTitle>(
            r#"
            SELECT ta.*, t.title AS test_title
            FROM test_attempts ta
            LEFT JOIN tests t ON t.id = ta.test_id
            WHERE ($1 = FALSE OR ta.is_flagged = TRUE)
            ORDER BY ta.started_at DESC
            "#,
        )
        .bind(flagged_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<AttemptWithTitle>> {
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
}

fn section_counts(section: &Option<SectionConfig>) -> (i32, Decimal) {
    match section {
        Some(s) if s.enabled && s.count > 0 => {
            (s.count, Decimal::from(s.count) * s.marks_per_question)
        }
        _ => (0, Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sections_contribute_nothing() {
        let section = Some(SectionConfig {
            enabled: false,
            count: 10,
            marks_per_question: Decimal::from(2),
        });
        assert_eq!(section_counts(&section), (0, Decimal::ZERO));
        assert_eq!(section_counts(&None), (0, Decimal::ZERO));
    }

    #[test]
    fn enabled_section_totals_marks() {
        let section = Some(SectionConfig {
            enabled: true,
            count: 10,
            marks_per_question: Decimal::from(2),
        });
        assert_eq!(section_counts(&section), (10, Decimal::from(20)));
    }
}
