use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dto::test_dto::AnswerDetail;
use crate::models::question::{Question, QuestionType};
use crate::models::user_answer::UserAnswer;

/// Fixed pass threshold in percent. The per-test `passing_marks` field is
/// stored and reported but does not participate in the verdict.
pub const PASS_THRESHOLD_PERCENT: i64 = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub score: Decimal,
    pub total_marks: Decimal,
    pub percentage: Decimal,
    pub passed: bool,
}

pub struct ScoringService;

impl ScoringService {
    /// Synchronous scoring at submission time. Only mcq questions with a
    /// known correct answer are scored; comparison is exact string
    /// equality, case-sensitive. Everything else stays ungraded.
    pub fn auto_score(question: &Question, answer_text: Option<&str>) -> (Option<bool>, Decimal) {
        if question.question_type != QuestionType::Mcq {
            return (None, Decimal::ZERO);
        }
        let Some(correct) = question.correct_answer.as_deref() else {
            return (None, Decimal::ZERO);
        };
        let is_correct = answer_text == Some(correct);
        let marks = if is_correct { question.marks } else { Decimal::ZERO };
        (Some(is_correct), marks)
    }

    /// Aggregate recorded answers into a final verdict. `attempt_total`
    /// wins unless it is zero, in which case the test's own total is used.
    pub fn summarize(
        attempt_total: Decimal,
        test_total: Decimal,
        answers: &[UserAnswer],
    ) -> ScoreSummary {
        let score: Decimal = answers.iter().map(|a| a.marks_obtained).sum();
        let total_marks = if attempt_total.is_zero() {
            test_total
        } else {
            attempt_total
        };
        let percentage = if total_marks > Decimal::ZERO {
            (score / total_marks * Decimal::from(100)).round_dp(2)
        } else {
            Decimal::ZERO
        };
        let passed = percentage >= Decimal::from(PASS_THRESHOLD_PERCENT);
        ScoreSummary {
            score,
            total_marks,
            percentage,
            passed,
        }
    }

    /// Per-question result rows. A deleted question degrades to empty
    /// text, null correct answer and zero max marks instead of failing
    /// the whole result.
    pub fn build_breakdown(
        answers: &[UserAnswer],
        questions: &HashMap<Uuid, Question>,
    ) -> Vec<AnswerDetail> {
        answers
            .iter()
            .map(|answer| {
                let question = questions.get(&answer.question_id);
                AnswerDetail {
                    question_id: answer.question_id,
                    question_text: question
                        .map(|q| q.question_text.clone())
                        .unwrap_or_default(),
                    user_answer: answer.answer_text.clone(),
                    correct_answer: question.and_then(|q| q.correct_answer.clone()),
                    is_correct: answer.is_correct,
                    marks_obtained: answer.marks_obtained,
                    max_marks: question.map(|q| q.marks).unwrap_or(Decimal::ZERO),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn question(question_type: QuestionType, correct: Option<&str>, marks: i64) -> Question {
        Question {
            id: Uuid::new_v4(),
            question_type,
            question_text: "What is 2 + 2?".to_string(),
            division_id: None,
            options: Some(serde_json::json!(["3", "4", "5", "6"])),
            correct_answer: correct.map(String::from),
            media_url: None,
            marks: Decimal::from(marks),
            difficulty: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn answer(question_id: Uuid, marks_obtained: i64) -> UserAnswer {
        UserAnswer {
            id: Uuid::new_v4(),
            attempt_id: Uuid::new_v4(),
            question_id,
            answer_text: Some("4".to_string()),
            annotation_data: None,
            is_correct: Some(marks_obtained > 0),
            marks_obtained: Decimal::from(marks_obtained),
            time_spent_seconds: Some(30),
            answered_at: Utc::now(),
        }
    }

    #[test]
    fn correct_mcq_answer_earns_full_marks() {
        let q = question(QuestionType::Mcq, Some("4"), 2);
        let (is_correct, marks) = ScoringService::auto_score(&q, Some("4"));
        assert_eq!(is_correct, Some(true));
        assert_eq!(marks, Decimal::from(2));
    }

    #[test]
    fn wrong_mcq_answer_earns_zero() {
        let q = question(QuestionType::Mcq, Some("4"), 2);
        let (is_correct, marks) = ScoringService::auto_score(&q, Some("3"));
        assert_eq!(is_correct, Some(false));
        assert_eq!(marks, Decimal::ZERO);
    }

    #[test]
    fn mcq_comparison_is_case_sensitive() {
        let q = question(QuestionType::Mcq, Some("Paris"), 1);
        let (is_correct, _) = ScoringService::auto_score(&q, Some("paris"));
        assert_eq!(is_correct, Some(false));
    }

    #[test]
    fn annotation_questions_stay_ungraded() {
        let q = question(QuestionType::ImageAnnotation, None, 10);
        let (is_correct, marks) = ScoringService::auto_score(&q, Some("boxes"));
        assert_eq!(is_correct, None);
        assert_eq!(marks, Decimal::ZERO);
    }

    #[test]
    fn mcq_without_correct_answer_stays_ungraded() {
        let q = question(QuestionType::Mcq, None, 1);
        let (is_correct, marks) = ScoringService::auto_score(&q, Some("4"));
        assert_eq!(is_correct, None);
        assert_eq!(marks, Decimal::ZERO);
    }

    #[test]
    fn eighty_percent_passes() {
        let answers = vec![answer(Uuid::new_v4(), 5), answer(Uuid::new_v4(), 3)];
        let summary = ScoringService::summarize(Decimal::from(10), Decimal::ZERO, &answers);
        assert_eq!(summary.score, Decimal::from(8));
        assert_eq!(summary.percentage, Decimal::from(80));
        assert!(summary.passed);
    }

    #[test]
    fn forty_percent_fails() {
        let answers = vec![answer(Uuid::new_v4(), 4)];
        let summary = ScoringService::summarize(Decimal::from(10), Decimal::ZERO, &answers);
        assert_eq!(summary.percentage, Decimal::from(40));
        assert!(!summary.passed);
    }

    #[test]
    fn exactly_fifty_percent_passes() {
        let answers = vec![answer(Uuid::new_v4(), 5)];
        let summary = ScoringService::summarize(Decimal::from(10), Decimal::ZERO, &answers);
        assert!(summary.passed);
    }

    #[test]
    fn zero_total_marks_yields_zero_percentage() {
        let summary = ScoringService::summarize(Decimal::ZERO, Decimal::ZERO, &[]);
        assert_eq!(summary.percentage, Decimal::ZERO);
        assert!(!summary.passed);
    }

    #[test]
    fn attempt_total_of_zero_falls_back_to_test_total() {
        let answers = vec![answer(Uuid::new_v4(), 5)];
        let summary = ScoringService::summarize(Decimal::ZERO, Decimal::from(20), &answers);
        assert_eq!(summary.total_marks, Decimal::from(20));
        assert_eq!(summary.percentage, Decimal::from(25));
    }

    #[test]
    fn breakdown_tolerates_deleted_question() {
        let q = question(QuestionType::Mcq, Some("4"), 2);
        let known = answer(q.id, 2);
        let orphan = answer(Uuid::new_v4(), 0);
        let questions: HashMap<Uuid, Question> = HashMap::from([(q.id, q.clone())]);

        let breakdown = ScoringService::build_breakdown(&[known, orphan], &questions);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].question_text, q.question_text);
        assert_eq!(breakdown[0].correct_answer, Some("4".to_string()));
        assert_eq!(breakdown[0].max_marks, Decimal::from(2));
        assert_eq!(breakdown[1].question_text, "");
        assert_eq!(breakdown[1].correct_answer, None);
        assert_eq!(breakdown[1].max_marks, Decimal::ZERO);
    }
}
