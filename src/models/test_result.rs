use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reported for a candidate with no result row yet.
pub const STATUS_NOT_STARTED: &str = "Not Started";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_COMPLETED: &str = "Completed";

/// One candidate's attempt at one mock test. A missing row means "Not Started".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: Uuid,
    pub mock_test_id: Uuid,
    pub candidate_id: Uuid,
    pub score: i32,
    pub total_points: i32,
    pub rank: Option<i32>,
    pub has_passed: bool,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TestResult {
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TestAnswer {
    pub id: Uuid,
    pub test_result_id: Uuid,
    pub question_id: Uuid,
    pub selected_option_id: Uuid,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// Completed result joined with the candidate, as loaded for ranking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompletedResultRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub score: i32,
    pub total_points: i32,
    pub has_passed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
