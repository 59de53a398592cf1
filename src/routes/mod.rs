pub mod admin;
pub mod assessments;
pub mod auth;
pub mod courses;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod tests;
