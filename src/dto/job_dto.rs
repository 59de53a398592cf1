use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::job::Job;

#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub company_name: String,
    pub company_logo: Option<String>,
    pub role: String,
    pub location: Option<String>,
    pub ctc: Option<Decimal>,
    pub job_type: Option<String>,
    pub offer_type: String,
    pub has_applied: bool,
    pub created_at: DateTime<Utc>,
}

impl JobResponse {
    pub fn from_job(job: Job, has_applied: bool) -> Self {
        Self {
            id: job.id,
            company_name: job.company_name,
            company_logo: job.company_logo,
            role: job.role,
            location: job.location,
            ctc: job.ctc,
            job_type: job.job_type,
            offer_type: job.offer_type,
            has_applied,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobApplicationResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
    pub company_name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStats {
    pub jobs_applied: i64,
    pub applications_pending: i64,
}
