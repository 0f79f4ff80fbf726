use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job_application::{ApplicationDetail, ApplicationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    pub job_id: Uuid,
    #[validate(length(max = 5000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusPayload {
    #[validate(length(min = 1))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub status: ApplicationStatus,
    pub count: usize,
    pub applications: Vec<ApplicationDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobBoardResponse {
    pub job_id: Uuid,
    pub job_title: String,
    pub columns: Vec<BoardColumn>,
}

impl JobBoardResponse {
    /// One column per status in pipeline order; empty columns are kept.
    pub fn build(job_id: Uuid, job_title: String, applications: Vec<ApplicationDetail>) -> Self {
        let mut columns: Vec<BoardColumn> = ApplicationStatus::ALL
            .iter()
            .map(|status| BoardColumn {
                status: *status,
                count: 0,
                applications: Vec::new(),
            })
            .collect();

        for application in applications {
            let Ok(status) = application.status.parse::<ApplicationStatus>() else {
                tracing::warn!(application_id = %application.id, status = %application.status, "skipping application with unknown status");
                continue;
            };
            if let Some(column) = columns.iter_mut().find(|c| c.status == status) {
                column.applications.push(application);
            }
        }
        for column in &mut columns {
            column.count = column.applications.len();
        }

        Self {
            job_id,
            job_title,
            columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn detail(status: &str) -> ApplicationDetail {
        ApplicationDetail {
            id: Uuid::new_v4(),
            job_id: Uuid::nil(),
            job_title: "Backend Engineer".into(),
            candidate_id: Uuid::new_v4(),
            candidate_name: "Dana".into(),
            candidate_email: "dana@example.com".into(),
            status: status.into(),
            cover_letter: None,
            applied_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn board_has_every_column_in_pipeline_order() {
        let board = JobBoardResponse::build(
            Uuid::nil(),
            "Backend Engineer".into(),
            vec![detail("Applied"), detail("Shortlisted"), detail("Applied")],
        );
        let statuses: Vec<ApplicationStatus> = board.columns.iter().map(|c| c.status).collect();
        assert_eq!(statuses, ApplicationStatus::ALL.to_vec());
        assert_eq!(board.columns[0].count, 2);
        assert_eq!(board.columns[2].count, 1);
        assert_eq!(board.columns[6].count, 0);
    }
}
