use crate::dto::api_response::PagedResponse;
use crate::dto::job_dto::{check_salary_band, CreateJobPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JOB_STATUS_CLOSED, JOB_STATUS_OPEN};
use crate::utils::pagination::{PageQuery, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, company_id, title, description, location, employment_type, salary_min, salary_max, status, created_at, updated_at";

#[derive(Clone)]
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, company_id: Uuid, payload: CreateJobPayload) -> Result<Job> {
        check_salary_band(payload.salary_min, payload.salary_max).map_err(Error::BadRequest)?;

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (company_id, title, description, location, employment_type, salary_min, salary_max, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(company_id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.location)
        .bind(payload.employment_type)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(JOB_STATUS_OPEN)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(job_id = %job.id, company_id = %company_id, "job created");
        Ok(job)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Job> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        Ok(job)
    }

    /// Loads a job and checks that `company_id` owns it.
    pub async fn get_owned(&self, id: Uuid, company_id: Uuid) -> Result<Job> {
        let job = self.get_by_id(id).await?;
        if job.company_id != company_id {
            return Err(Error::Forbidden(
                "Job belongs to another company".to_string(),
            ));
        }
        Ok(job)
    }

    pub async fn list_for_company(
        &self,
        company_id: Uuid,
        query: PageQuery,
    ) -> Result<PagedResponse<Job>> {
        let items = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {} FROM jobs
            WHERE company_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            JOB_COLUMNS
        ))
        .bind(company_id)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE company_id = $1")
            .bind(company_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(PagedResponse::new(items, Pagination::from_query(&query, total)))
    }

    pub async fn update(&self, id: Uuid, company_id: Uuid, payload: UpdateJobPayload) -> Result<Job> {
        let current = self.get_owned(id, company_id).await?;

        let status = match payload.status.as_deref() {
            None => None,
            Some(s) if s.eq_ignore_ascii_case(JOB_STATUS_OPEN) => Some(JOB_STATUS_OPEN),
            Some(s) if s.eq_ignore_ascii_case(JOB_STATUS_CLOSED) => Some(JOB_STATUS_CLOSED),
            Some(other) => {
                return Err(Error::BadRequest(format!(
                    "Unknown job status '{}'; expected Open or Closed",
                    other
                )))
            }
        };
        check_salary_band(
            payload.salary_min.or(current.salary_min),
            payload.salary_max.or(current.salary_max),
        )
        .map_err(Error::BadRequest)?;

        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                employment_type = COALESCE($5, employment_type),
                salary_min = COALESCE($6, salary_min),
                salary_max = COALESCE($7, salary_max),
                status = COALESCE($8, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.location)
        .bind(payload.employment_type)
        .bind(payload.salary_min)
        .bind(payload.salary_max)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<()> {
        self.get_owned(id, company_id).await?;
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }
}
