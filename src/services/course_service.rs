use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::course_dto::{CourseEnrollmentResponse, CourseStats};
use crate::error::Result;
use crate::models::course::{Course, CourseEnrollment};

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT * FROM courses WHERE is_active = TRUE ORDER BY created_at DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    pub async fn enrolled_for(&self, user_id: Uuid) -> Result<Vec<CourseEnrollmentResponse>> {
        let enrollments = sqlx::query_as::<_, CourseEnrollment>(
            r#"
            SELECT * FROM course_enrollments
            WHERE user_id = $1
            ORDER BY enrolled_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();
        let courses = sqlx::query_as::<_, Course>(r#"SELECT * FROM courses WHERE id = ANY($1)"#)
            .bind(&course_ids)
            .fetch_all(&self.pool)
            .await?;
        let by_id: HashMap<Uuid, Course> = courses.into_iter().map(|c| (c.id, c)).collect();

        Ok(enrollments
            .into_iter()
            .filter_map(|enrollment| {
                let course = by_id.get(&enrollment.course_id).cloned()?;
                Some(CourseEnrollmentResponse {
                    id: enrollment.id,
                    course_id: enrollment.course_id,
                    progress: enrollment.progress,
                    completed: enrollment.completed,
                    enrolled_at: enrollment.enrolled_at,
                    completed_at: enrollment.completed_at,
                    course,
                })
            })
            .collect())
    }

    pub async fn stats_for(&self, user_id: Uuid) -> Result<CourseStats> {
        let enrollments = sqlx::query_as::<_, CourseEnrollment>(
            r#"SELECT * FROM course_enrollments WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let total = enrollments.len() as i64;
        let completed = enrollments.iter().filter(|e| e.completed).count() as i64;
        let total_progress: f64 = enrollments.iter().map(|e| e.progress).sum();

        Ok(CourseStats {
            courses_enrolled: total,
            completion_percentage: if total > 0 {
                total_progress / total as f64
            } else {
                0.0
            },
            completed,
            expired: 0,
        })
    }
}
