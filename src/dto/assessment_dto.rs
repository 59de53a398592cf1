use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStats {
    pub tests_enrolled: i64,
    pub tests_completed: i64,
    pub badges: i64,
    pub super_badges: i64,
}
