use crate::dto::api_response::PagedResponse;
use crate::dto::mock_test_dto::{
    percentage_f64, CandidateTestView, RankedResultResponse, SubmitTestPayload,
    TestRankingResponse, TestResultResponse,
};
use crate::error::{Error, Result};
use crate::models::job_application::ApplicationStatus;
use crate::models::mock_test::MockTest;
use crate::models::test_result::{
    CompletedResultRow, TestAnswer, TestResult, STATUS_COMPLETED, STATUS_IN_PROGRESS,
    STATUS_NOT_STARTED,
};
use crate::services::grading_service::GradingService;
use crate::services::mock_test_service::{fetch_mock_test, load_questions, MOCK_TEST_COLUMNS};
use crate::utils::pagination::{PageQuery, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

const RESULT_COLUMNS: &str = "id, mock_test_id, candidate_id, score, total_points, rank, has_passed, status, started_at, completed_at";

/// Candidate attempts at mock tests: start, submit, review and ranking.
#[derive(Clone)]
pub struct TestService {
    pool: PgPool,
}

impl TestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_result(&self, test_id: Uuid, candidate_id: Uuid) -> Result<Option<TestResult>> {
        let result = sqlx::query_as::<_, TestResult>(&format!(
            "SELECT {} FROM test_results WHERE mock_test_id = $1 AND candidate_id = $2",
            RESULT_COLUMNS
        ))
        .bind(test_id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(result)
    }

    async fn load_answers(&self, result_id: Uuid) -> Result<Vec<TestAnswer>> {
        let answers = sqlx::query_as::<_, TestAnswer>(
            r#"
            SELECT a.id, a.test_result_id, a.question_id, a.selected_option_id, a.is_correct, a.answered_at
            FROM test_answers a
            JOIN test_questions q ON q.id = a.question_id
            WHERE a.test_result_id = $1
            ORDER BY q.order_index, a.answered_at
            "#,
        )
        .bind(result_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(answers)
    }

    async fn ensure_shortlisted(&self, job_id: Uuid, candidate_id: Uuid) -> Result<()> {
        let shortlisted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM job_applications
                WHERE job_id = $1 AND candidate_id = $2 AND status = $3
            )
            "#,
        )
        .bind(job_id)
        .bind(candidate_id)
        .bind(ApplicationStatus::Shortlisted.as_str())
        .fetch_one(&self.pool)
        .await?;

        if !shortlisted {
            return Err(Error::Forbidden(
                "Only shortlisted candidates can take this test".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn list_tests_for_job(&self, job_id: Uuid) -> Result<Vec<MockTest>> {
        let job_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?;
        if !job_exists {
            return Err(Error::NotFound("Job not found".to_string()));
        }

        let tests = sqlx::query_as::<_, MockTest>(&format!(
            r#"
            SELECT {} FROM mock_tests
            WHERE job_id = $1 AND is_active = TRUE
            ORDER BY created_at
            "#,
            MOCK_TEST_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tests)
    }

    pub async fn get_test_for_candidate(
        &self,
        test_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<CandidateTestView> {
        let test = fetch_mock_test(&self.pool, test_id).await?;
        self.ensure_shortlisted(test.job_id, candidate_id).await?;

        let attempt_status = self
            .find_result(test_id, candidate_id)
            .await?
            .map(|r| r.status)
            .unwrap_or_else(|| STATUS_NOT_STARTED.to_string());
        let questions = load_questions(&self.pool, test_id).await?;

        Ok(CandidateTestView::new(test, questions, attempt_status))
    }

    pub async fn start_test(&self, test_id: Uuid, candidate_id: Uuid) -> Result<TestResultResponse> {
        let test = fetch_mock_test(&self.pool, test_id).await?;
        self.ensure_shortlisted(test.job_id, candidate_id).await?;

        if self.find_result(test_id, candidate_id).await?.is_some() {
            return Err(Error::Conflict(
                "Test has already been started".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let total_points: i32 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(points), 0)::INT FROM test_questions WHERE mock_test_id = $1",
        )
        .bind(test_id)
        .fetch_one(&mut *tx)
        .await?;

        // A concurrent start loses on uq_test_results_test_candidate.
        let result = sqlx::query_as::<_, TestResult>(&format!(
            r#"
            INSERT INTO test_results (mock_test_id, candidate_id, score, total_points, has_passed, status, started_at)
            VALUES ($1, $2, 0, $3, FALSE, $4, NOW())
            RETURNING {}
            "#,
            RESULT_COLUMNS
        ))
        .bind(test_id)
        .bind(candidate_id)
        .bind(total_points)
        .bind(STATUS_IN_PROGRESS)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE mock_tests SET total_applicants = total_applicants + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(test_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(
            test_id = %test_id,
            candidate_id = %candidate_id,
            result_id = %result.id,
            total_points,
            "test started"
        );

        Ok(TestResultResponse::new(result, None))
    }

    pub async fn submit_test(
        &self,
        test_id: Uuid,
        candidate_id: Uuid,
        payload: SubmitTestPayload,
    ) -> Result<TestResultResponse> {
        let test = fetch_mock_test(&self.pool, test_id).await?;
        let current = self
            .find_result(test_id, candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound("Test has not been started".to_string()))?;
        if current.is_completed() {
            return Err(Error::Conflict("Test has already been submitted".to_string()));
        }

        let questions = load_questions(&self.pool, test_id).await?;
        let graded = GradingService::grade(&questions, &payload.answers);
        let has_passed = GradingService::has_passed(graded.score, test.passing_score);
        let skipped = payload.answers.len() - graded.answers.len();

        let mut tx = self.pool.begin().await?;

        let completed = sqlx::query_as::<_, TestResult>(&format!(
            r#"
            UPDATE test_results
            SET score = $2, has_passed = $3, status = $4, completed_at = NOW()
            WHERE id = $1 AND status = $5
            RETURNING {}
            "#,
            RESULT_COLUMNS
        ))
        .bind(current.id)
        .bind(graded.score)
        .bind(has_passed)
        .bind(STATUS_COMPLETED)
        .bind(STATUS_IN_PROGRESS)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(completed) = completed else {
            tx.rollback().await?;
            return Err(Error::Conflict("Test has already been submitted".to_string()));
        };

        let mut answers = Vec::with_capacity(graded.answers.len());
        for answer in &graded.answers {
            let row = sqlx::query_as::<_, TestAnswer>(
                r#"
                INSERT INTO test_answers (test_result_id, question_id, selected_option_id, is_correct)
                VALUES ($1, $2, $3, $4)
                RETURNING id, test_result_id, question_id, selected_option_id, is_correct, answered_at
                "#,
            )
            .bind(completed.id)
            .bind(answer.question_id)
            .bind(answer.selected_option_id)
            .bind(answer.is_correct)
            .fetch_one(&mut *tx)
            .await?;
            answers.push(row);
        }

        tx.commit().await?;
        tracing::info!(
            test_id = %test_id,
            candidate_id = %candidate_id,
            score = completed.score,
            total_points = completed.total_points,
            has_passed,
            skipped,
            "test submitted"
        );

        Ok(TestResultResponse::new(completed, Some(answers)))
    }

    /// Ranks completed results by score and writes each rank back.
    ///
    /// Ranks are recomputed on every call, so a result completed since the
    /// previous read is slotted in here.
    pub async fn rank_results(&self, test_id: Uuid, company_id: Uuid) -> Result<TestRankingResponse> {
        let test = fetch_mock_test(&self.pool, test_id).await?;
        if test.company_id != company_id {
            return Err(Error::Forbidden(
                "Mock test belongs to another company".to_string(),
            ));
        }

        let rows = sqlx::query_as::<_, CompletedResultRow>(
            r#"
            SELECT
                r.id,
                r.candidate_id,
                c.full_name AS candidate_name,
                c.email AS candidate_email,
                r.score,
                r.total_points,
                r.has_passed,
                r.completed_at
            FROM test_results r
            JOIN candidates c ON c.id = r.candidate_id
            WHERE r.mock_test_id = $1 AND r.status = $2
            ORDER BY r.score DESC, r.completed_at ASC, r.id ASC
            "#,
        )
        .bind(test_id)
        .bind(STATUS_COMPLETED)
        .fetch_all(&self.pool)
        .await?;

        let ranked = GradingService::rank(rows, |row| row.score);

        let mut tx = self.pool.begin().await?;
        for (rank, row) in &ranked {
            sqlx::query("UPDATE test_results SET rank = $2 WHERE id = $1")
                .bind(row.id)
                .bind(*rank)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        tracing::debug!(test_id = %test_id, ranked = ranked.len(), "ranks persisted");

        let results = ranked
            .into_iter()
            .map(|(rank, row)| RankedResultResponse {
                rank,
                result_id: row.id,
                candidate_id: row.candidate_id,
                candidate_name: row.candidate_name,
                candidate_email: row.candidate_email,
                score: row.score,
                total_points: row.total_points,
                percentage: percentage_f64(row.score, row.total_points),
                has_passed: row.has_passed,
                completed_at: row.completed_at,
            })
            .collect();

        Ok(TestRankingResponse {
            test_id: test.id,
            title: test.title,
            passing_score: test.passing_score,
            total_applicants: test.total_applicants,
            results,
        })
    }

    pub async fn get_my_result(&self, test_id: Uuid, candidate_id: Uuid) -> Result<TestResultResponse> {
        let result = self
            .find_result(test_id, candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound("No result for this test".to_string()))?;

        let answers = if result.is_completed() {
            Some(self.load_answers(result.id).await?)
        } else {
            None
        };
        Ok(TestResultResponse::new(result, answers))
    }

    pub async fn list_my_results(
        &self,
        candidate_id: Uuid,
        query: PageQuery,
    ) -> Result<PagedResponse<TestResultResponse>> {
        let rows = sqlx::query_as::<_, TestResult>(&format!(
            r#"
            SELECT {} FROM test_results
            WHERE candidate_id = $1
            ORDER BY started_at DESC
            LIMIT $2 OFFSET $3
            "#,
            RESULT_COLUMNS
        ))
        .bind(candidate_id)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM test_results WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(PagedResponse::new(rows, Pagination::from_query(&query, total))
            .map(|r| TestResultResponse::new(r, None)))
    }
}
