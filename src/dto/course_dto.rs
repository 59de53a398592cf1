use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::course::Course;

#[derive(Debug, Clone, Serialize)]
pub struct CourseEnrollmentResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub progress: f64,
    pub completed: bool,
    pub enrolled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub course: Course,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseStats {
    pub courses_enrolled: i64,
    pub completion_percentage: f64,
    pub completed: i64,
    pub expired: i64,
}
