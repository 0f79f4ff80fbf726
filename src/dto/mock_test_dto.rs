use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::mock_test::{MockTest, QuestionWithOptions};
use crate::models::test_result::{TestAnswer, TestResult};
use crate::services::grading_service::{AnswerChoice, GradingService};
use rust_decimal::prelude::ToPrimitive;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionPayload {
    #[validate(length(min = 1, message = "Option text cannot be empty"))]
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionPayload {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub question_text: String,
    #[validate(range(min = 0, max = 1000, message = "Points must be between 0 and 1000"))]
    pub points: i32,
    #[validate(
        length(min = 2, max = 20, message = "A question needs between two and twenty options"),
        nested
    )]
    pub options: Vec<CreateOptionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMockTestPayload {
    pub job_id: Uuid,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: i32,
    #[validate(range(min = 0, message = "Passing score cannot be negative"))]
    pub passing_score: i32,
    #[validate(
        length(min = 1, max = 200, message = "A test needs between one and 200 questions"),
        nested
    )]
    pub questions: Vec<CreateQuestionPayload>,
}

impl CreateMockTestPayload {
    /// Structural rules `validator` cannot express: every question needs a
    /// correct option, and the pass mark must be reachable.
    pub fn check_answer_key(&self) -> Result<(), String> {
        for (idx, q) in self.questions.iter().enumerate() {
            if !q.options.iter().any(|o| o.is_correct) {
                return Err(format!("Question {} has no correct option", idx + 1));
            }
        }
        let total: i64 = self.questions.iter().map(|q| i64::from(q.points)).sum();
        if i64::from(self.passing_score) > total {
            return Err(format!(
                "Passing score {} exceeds the test's total of {} points",
                self.passing_score, total
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMockTestPayload {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0, message = "Passing score cannot be negative"))]
    pub passing_score: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTestPayload {
    #[serde(default)]
    pub answers: Vec<AnswerChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionResponse {
    pub id: Uuid,
    pub option_text: String,
    pub is_correct: bool,
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: Uuid,
    pub question_text: String,
    pub points: i32,
    pub order_index: i32,
    pub options: Vec<OptionResponse>,
}

/// Company view of a test, answer key included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockTestDetailResponse {
    #[serde(flatten)]
    pub test: MockTest,
    pub total_points: i32,
    pub questions: Vec<QuestionResponse>,
}

impl MockTestDetailResponse {
    pub fn new(test: MockTest, questions: Vec<QuestionWithOptions>) -> Self {
        let total_points = GradingService::total_points(&questions);
        let questions = questions
            .into_iter()
            .map(|q| QuestionResponse {
                id: q.question.id,
                question_text: q.question.question_text,
                points: q.question.points,
                order_index: q.question.order_index,
                options: q
                    .options
                    .into_iter()
                    .map(|o| OptionResponse {
                        id: o.id,
                        option_text: o.option_text,
                        is_correct: o.is_correct,
                        order_index: o.order_index,
                    })
                    .collect(),
            })
            .collect();
        Self {
            test,
            total_points,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateOptionView {
    pub id: Uuid,
    pub option_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateQuestionView {
    pub id: Uuid,
    pub question_text: String,
    pub points: i32,
    pub options: Vec<CandidateOptionView>,
}

/// Candidate view of a test. Never carries correctness flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTestView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub passing_score: i32,
    pub total_points: i32,
    pub question_count: usize,
    pub attempt_status: String,
    pub questions: Vec<CandidateQuestionView>,
}

impl CandidateTestView {
    pub fn new(test: MockTest, questions: Vec<QuestionWithOptions>, attempt_status: String) -> Self {
        let total_points = GradingService::total_points(&questions);
        let question_count = questions.len();
        let questions = questions
            .into_iter()
            .map(|q| CandidateQuestionView {
                id: q.question.id,
                question_text: q.question.question_text,
                points: q.question.points,
                options: q
                    .options
                    .into_iter()
                    .map(|o| CandidateOptionView {
                        id: o.id,
                        option_text: o.option_text,
                    })
                    .collect(),
            })
            .collect();
        Self {
            id: test.id,
            job_id: test.job_id,
            title: test.title,
            description: test.description,
            duration_minutes: test.duration_minutes,
            passing_score: test.passing_score,
            total_points,
            question_count,
            attempt_status,
            questions,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReview {
    pub question_id: Uuid,
    pub selected_option_id: Uuid,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultResponse {
    pub id: Uuid,
    pub mock_test_id: Uuid,
    pub candidate_id: Uuid,
    pub score: i32,
    pub total_points: i32,
    pub percentage: f64,
    pub rank: Option<i32>,
    pub has_passed: bool,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnswerReview>>,
}

impl TestResultResponse {
    pub fn new(result: TestResult, answers: Option<Vec<TestAnswer>>) -> Self {
        let percentage = percentage_f64(result.score, result.total_points);
        Self {
            id: result.id,
            mock_test_id: result.mock_test_id,
            candidate_id: result.candidate_id,
            score: result.score,
            total_points: result.total_points,
            percentage,
            rank: result.rank,
            has_passed: result.has_passed,
            status: result.status,
            started_at: result.started_at,
            completed_at: result.completed_at,
            answers: answers.map(|rows| {
                rows.into_iter()
                    .map(|a| AnswerReview {
                        question_id: a.question_id,
                        selected_option_id: a.selected_option_id,
                        is_correct: a.is_correct,
                    })
                    .collect()
            }),
        }
    }
}

pub(crate) fn percentage_f64(score: i32, total_points: i32) -> f64 {
    GradingService::percentage(score, total_points)
        .to_f64()
        .unwrap_or_default()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResultResponse {
    pub rank: i32,
    pub result_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub score: i32,
    pub total_points: i32,
    pub percentage: f64,
    pub has_passed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRankingResponse {
    pub test_id: Uuid,
    pub title: String,
    pub passing_score: i32,
    pub total_applicants: i32,
    pub results: Vec<RankedResultResponse>,
}
