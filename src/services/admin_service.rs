use std::collections::BTreeMap;

use crate::dto::admin_dto::DashboardStats;
use crate::error::Result;
use crate::models::job::JOB_STATUS_OPEN;
use crate::models::job_application::ApplicationStatus;
use crate::models::support_ticket::TICKET_STATUS_OPEN;
use crate::models::test_result::STATUS_COMPLETED;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Application counts keyed by status; every status is present.
    pub async fn application_status_counts(&self) -> Result<BTreeMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*) AS count
            FROM job_applications
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts: BTreeMap<String, i64> = ApplicationStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in rows {
            counts.insert(status, count);
        }
        Ok(counts)
    }

    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let applications_by_status = self.application_status_counts().await?;

        let open_jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE status = $1")
            .bind(JOB_STATUS_OPEN)
            .fetch_one(&self.pool)
            .await?;
        let completed_test_results: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM test_results WHERE status = $1")
                .bind(STATUS_COMPLETED)
                .fetch_one(&self.pool)
                .await?;
        let open_support_tickets: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM support_tickets WHERE status = $1")
                .bind(TICKET_STATUS_OPEN)
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            total_candidates: self.count("SELECT COUNT(*) FROM candidates").await?,
            total_companies: self.count("SELECT COUNT(*) FROM companies").await?,
            open_jobs,
            total_applications: applications_by_status.values().sum(),
            applications_by_status,
            total_mock_tests: self.count("SELECT COUNT(*) FROM mock_tests").await?,
            completed_test_results,
            open_support_tickets,
        })
    }
}
