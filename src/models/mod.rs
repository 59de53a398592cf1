pub mod assessment;
pub mod course;
pub mod division;
pub mod job;
pub mod message;
pub mod question;
pub mod test;
pub mod test_attempt;
pub mod user;
pub mod user_answer;
