use crate::dto::api_response::PagedResponse;
use crate::dto::application_dto::{ApplyPayload, JobBoardResponse, UpdateApplicationStatusPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::Role;
use crate::models::job::Job;
use crate::models::job_application::{ApplicationDetail, ApplicationStatus, JobApplication};
use crate::models::notification::NewNotification;
use crate::services::notification_service::NotificationService;
use crate::utils::pagination::{PageQuery, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

const APPLICATION_COLUMNS: &str =
    "id, job_id, candidate_id, status, cover_letter, applied_at, updated_at";

const DETAIL_SELECT: &str = r#"
    SELECT
        a.id,
        a.job_id,
        j.title AS job_title,
        a.candidate_id,
        c.full_name AS candidate_name,
        c.email AS candidate_email,
        a.status,
        a.cover_letter,
        a.applied_at,
        a.updated_at
    FROM job_applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN candidates c ON c.id = a.candidate_id
"#;

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    notifications: NotificationService,
}

impl ApplicationService {
    pub fn new(pool: PgPool, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    async fn fetch_job(&self, job_id: Uuid) -> Result<Job> {
        sqlx::query_as::<_, Job>(
            "SELECT id, company_id, title, description, location, employment_type, salary_min, salary_max, status, created_at, updated_at FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    pub async fn apply(&self, candidate_id: Uuid, payload: ApplyPayload) -> Result<JobApplication> {
        let job = self.fetch_job(payload.job_id).await?;
        if !job.is_open() {
            return Err(Error::BadRequest(
                "Job is closed to new applications".to_string(),
            ));
        }

        let application = sqlx::query_as::<_, JobApplication>(&format!(
            r#"
            INSERT INTO job_applications (job_id, candidate_id, status, cover_letter)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        ))
        .bind(job.id)
        .bind(candidate_id)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(&payload.cover_letter)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match Error::from(err) {
            Error::DuplicateEntry(_) => {
                Error::DuplicateEntry("You have already applied to this job".to_string())
            }
            other => other,
        })?;

        tracing::info!(application_id = %application.id, job_id = %job.id, candidate_id = %candidate_id, "application submitted");

        self.notifications
            .notify(NewNotification {
                recipient_id: job.company_id,
                recipient_role: Role::Company.as_str().to_string(),
                kind: "application_received".to_string(),
                title: "New application".to_string(),
                message: format!("A candidate applied to \"{}\"", job.title),
                link: Some(format!("/company/jobs/{}/board", job.id)),
            })
            .await;

        Ok(application)
    }

    pub async fn list_for_candidate(
        &self,
        candidate_id: Uuid,
        query: PageQuery,
    ) -> Result<PagedResponse<ApplicationDetail>> {
        let items = sqlx::query_as::<_, ApplicationDetail>(&format!(
            "{} WHERE a.candidate_id = $1 ORDER BY a.applied_at DESC, a.id LIMIT $2 OFFSET $3",
            DETAIL_SELECT
        ))
        .bind(candidate_id)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM job_applications WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(PagedResponse::new(items, Pagination::from_query(&query, total)))
    }

    pub async fn board(&self, job_id: Uuid, company_id: Uuid) -> Result<JobBoardResponse> {
        let job = self.fetch_job(job_id).await?;
        if job.company_id != company_id {
            return Err(Error::Forbidden("Job belongs to another company".to_string()));
        }

        let applications = sqlx::query_as::<_, ApplicationDetail>(&format!(
            "{} WHERE a.job_id = $1 ORDER BY a.applied_at, a.id",
            DETAIL_SELECT
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(JobBoardResponse::build(job.id, job.title, applications))
    }

    /// Moves an application between board columns.
    pub async fn update_status(
        &self,
        application_id: Uuid,
        company_id: Uuid,
        payload: UpdateApplicationStatusPayload,
    ) -> Result<ApplicationDetail> {
        let next: ApplicationStatus = payload.status.parse().map_err(Error::BadRequest)?;

        let current = sqlx::query_as::<_, ApplicationDetail>(&format!(
            "{} WHERE a.id = $1",
            DETAIL_SELECT
        ))
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        let job = self.fetch_job(current.job_id).await?;
        if job.company_id != company_id {
            return Err(Error::Forbidden("Job belongs to another company".to_string()));
        }

        let from: ApplicationStatus = current.status.parse().map_err(Error::Internal)?;
        if !from.can_transition_to(next) {
            return Err(Error::BadRequest(format!(
                "Cannot move application from {} to {}",
                from, next
            )));
        }

        // Conditional on the status read above; a concurrent move wins.
        let done = sqlx::query(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1 AND status = $3",
        )
        .bind(application_id)
        .bind(next.as_str())
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;
        if done.rows_affected() == 0 {
            return Err(Error::Conflict(
                "Application status changed concurrently".to_string(),
            ));
        }

        tracing::info!(application_id = %application_id, from = %from, to = %next, "application status changed");

        self.notifications
            .notify(NewNotification {
                recipient_id: current.candidate_id,
                recipient_role: Role::Candidate.as_str().to_string(),
                kind: "application_status".to_string(),
                title: "Application update".to_string(),
                message: format!(
                    "Your application for \"{}\" moved to {}",
                    current.job_title, next
                ),
                link: Some("/candidate/applications".to_string()),
            })
            .await;

        let updated = sqlx::query_as::<_, ApplicationDetail>(&format!(
            "{} WHERE a.id = $1",
            DETAIL_SELECT
        ))
        .bind(application_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }
}
