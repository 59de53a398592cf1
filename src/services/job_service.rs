use std::collections::HashSet;

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::job_dto::{JobApplicationResponse, JobResponse, JobStats};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobApplication};

#[derive(Debug, Clone, FromRow)]
struct ApplicationWithJob {
    #[sqlx(flatten)]
    application: JobApplication,
    company_name: String,
    role: String,
}

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for(&self, user_id: Uuid) -> Result<Vec<JobResponse>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"SELECT * FROM jobs WHERE is_active = TRUE ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let applied: Vec<(Uuid,)> =
            sqlx::query_as(r#"SELECT job_id FROM job_applications WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        let applied: HashSet<Uuid> = applied.into_iter().map(|(id,)| id).collect();

        Ok(jobs
            .into_iter()
            .map(|job| {
                let has_applied = applied.contains(&job.id);
                JobResponse::from_job(job, has_applied)
            })
            .collect())
    }

    pub async fn apply(&self, user_id: Uuid, job_id: Uuid) -> Result<JobApplication> {
        let job = sqlx::query_as::<_, Job>(
            r#"SELECT * FROM jobs WHERE id = $1 AND is_active = TRUE"#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"SELECT id FROM job_applications WHERE user_id = $1 AND job_id = $2"#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Err(Error::BadRequest(
                "Already applied for this job".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO job_applications (user_id, job_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(job.id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id = %user_id, job_id = %job_id, "job application submitted");
        Ok(application)
    }

    pub async fn my_applications(&self, user_id: Uuid) -> Result<Vec<JobApplicationResponse>> {
        let rows = sqlx::query_as::<_, ApplicationWithJob>(
            r#"
            SELECT ja.*, j.company_name, j.role
            FROM job_applications ja
            JOIN jobs j ON j.id = ja.job_id
            WHERE ja.user_id = $1
            ORDER BY ja.applied_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| JobApplicationResponse {
                id: row.application.id,
                job_id: row.application.job_id,
                status: row.application.status,
                applied_at: row.application.applied_at,
                company_name: row.company_name,
                role: row.role,
            })
            .collect())
    }

    pub async fn stats_for(&self, user_id: Uuid) -> Result<JobStats> {
        let jobs_applied: i64 =
            sqlx::query_scalar(r#"SELECT COUNT(*) FROM job_applications WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        let applications_pending: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM job_applications WHERE user_id = $1 AND status = 'applied'"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(JobStats {
            jobs_applied,
            applications_pending,
        })
    }
}
