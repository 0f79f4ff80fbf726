use crate::dto::api_response::PagedResponse;
use crate::dto::mock_test_dto::{
    CreateMockTestPayload, MockTestDetailResponse, UpdateMockTestPayload,
};
use crate::error::{Error, Result};
use crate::models::job::Job;
use crate::models::mock_test::{MockTest, QuestionWithOptions, TestQuestion, TestQuestionOption};
use crate::utils::pagination::{PageQuery, Pagination};
use sqlx::PgPool;
use uuid::Uuid;

pub(crate) const MOCK_TEST_COLUMNS: &str = "id, company_id, job_id, title, description, duration_minutes, passing_score, total_applicants, is_active, created_at, updated_at";

pub(crate) async fn fetch_mock_test(pool: &PgPool, id: Uuid) -> Result<MockTest> {
    sqlx::query_as::<_, MockTest>(&format!(
        "SELECT {} FROM mock_tests WHERE id = $1",
        MOCK_TEST_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| Error::NotFound("Mock test not found".to_string()))
}

/// Questions of a test in authoring order, each with its ordered options.
pub(crate) async fn load_questions(pool: &PgPool, test_id: Uuid) -> Result<Vec<QuestionWithOptions>> {
    let questions = sqlx::query_as::<_, TestQuestion>(
        r#"
        SELECT id, mock_test_id, question_text, points, order_index
        FROM test_questions
        WHERE mock_test_id = $1
        ORDER BY order_index, id
        "#,
    )
    .bind(test_id)
    .fetch_all(pool)
    .await?;

    let options = sqlx::query_as::<_, TestQuestionOption>(
        r#"
        SELECT o.id, o.question_id, o.option_text, o.is_correct, o.order_index
        FROM test_question_options o
        JOIN test_questions q ON q.id = o.question_id
        WHERE q.mock_test_id = $1
        ORDER BY o.order_index, o.id
        "#,
    )
    .bind(test_id)
    .fetch_all(pool)
    .await?;

    Ok(QuestionWithOptions::assemble(questions, options))
}

#[derive(Clone)]
pub struct MockTestService {
    pool: PgPool,
}

impl MockTestService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get_owned(&self, id: Uuid, company_id: Uuid) -> Result<MockTest> {
        let test = fetch_mock_test(&self.pool, id).await?;
        if test.company_id != company_id {
            return Err(Error::Forbidden(
                "Mock test belongs to another company".to_string(),
            ));
        }
        Ok(test)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        payload: CreateMockTestPayload,
    ) -> Result<MockTestDetailResponse> {
        payload.check_answer_key().map_err(Error::BadRequest)?;

        let job = sqlx::query_as::<_, Job>(
            "SELECT id, company_id, title, description, location, employment_type, salary_min, salary_max, status, created_at, updated_at FROM jobs WHERE id = $1",
        )
        .bind(payload.job_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        if job.company_id != company_id {
            return Err(Error::Forbidden("Job belongs to another company".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let test = sqlx::query_as::<_, MockTest>(&format!(
            r#"
            INSERT INTO mock_tests (company_id, job_id, title, description, duration_minutes, passing_score)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MOCK_TEST_COLUMNS
        ))
        .bind(company_id)
        .bind(job.id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.duration_minutes)
        .bind(payload.passing_score)
        .fetch_one(&mut *tx)
        .await?;

        for (q_idx, question) in payload.questions.iter().enumerate() {
            let question_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO test_questions (mock_test_id, question_text, points, order_index)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(test.id)
            .bind(&question.question_text)
            .bind(question.points)
            .bind(q_idx as i32)
            .fetch_one(&mut *tx)
            .await?;

            for (o_idx, option) in question.options.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO test_question_options (question_id, option_text, is_correct, order_index)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(question_id)
                .bind(&option.option_text)
                .bind(option.is_correct)
                .bind(o_idx as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::info!(
            test_id = %test.id,
            job_id = %job.id,
            questions = payload.questions.len(),
            "mock test created"
        );

        let questions = load_questions(&self.pool, test.id).await?;
        Ok(MockTestDetailResponse::new(test, questions))
    }

    pub async fn get_detail(&self, id: Uuid, company_id: Uuid) -> Result<MockTestDetailResponse> {
        let test = self.get_owned(id, company_id).await?;
        let questions = load_questions(&self.pool, test.id).await?;
        Ok(MockTestDetailResponse::new(test, questions))
    }

    pub async fn list_for_company(
        &self,
        company_id: Uuid,
        query: PageQuery,
    ) -> Result<PagedResponse<MockTest>> {
        let items = sqlx::query_as::<_, MockTest>(&format!(
            r#"
            SELECT {} FROM mock_tests
            WHERE company_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            MOCK_TEST_COLUMNS
        ))
        .bind(company_id)
        .bind(query.page_size())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM mock_tests WHERE company_id = $1")
                .bind(company_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(PagedResponse::new(items, Pagination::from_query(&query, total)))
    }

    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        payload: UpdateMockTestPayload,
    ) -> Result<MockTestDetailResponse> {
        self.get_owned(id, company_id).await?;

        if let Some(passing_score) = payload.passing_score {
            let total: i64 = sqlx::query_scalar(
                "SELECT COALESCE(SUM(points), 0)::BIGINT FROM test_questions WHERE mock_test_id = $1",
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
            if i64::from(passing_score) > total {
                return Err(Error::BadRequest(format!(
                    "Passing score {} exceeds the test's total of {} points",
                    passing_score, total
                )));
            }
        }

        let test = sqlx::query_as::<_, MockTest>(&format!(
            r#"
            UPDATE mock_tests
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                duration_minutes = COALESCE($4, duration_minutes),
                passing_score = COALESCE($5, passing_score),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MOCK_TEST_COLUMNS
        ))
        .bind(id)
        .bind(payload.title)
        .bind(payload.description)
        .bind(payload.duration_minutes)
        .bind(payload.passing_score)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await?;

        let questions = load_questions(&self.pool, test.id).await?;
        Ok(MockTestDetailResponse::new(test, questions))
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<()> {
        self.get_owned(id, company_id).await?;
        sqlx::query("DELETE FROM mock_tests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(test_id = %id, "mock test deleted");
        Ok(())
    }
}
