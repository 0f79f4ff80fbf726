use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::api_response::ApiResponse,
    dto::job_dto::{CreateJobPayload, UpdateJobPayload},
    error::Result,
    middleware::auth::AuthUser,
    utils::pagination::PageQuery,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = ApiResponse<Job>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_public_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::ok(job)))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/mock-tests",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Active mock tests attached to the job", body = ApiResponse<Vec<MockTest>>),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_job_mock_tests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let tests = state.test_service.list_tests_for_job(id).await?;
    Ok(Json(ApiResponse::ok(tests)))
}

#[utoipa::path(
    post,
    path = "/api/company/jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job created", body = ApiResponse<Job>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(job))))
}

#[utoipa::path(
    get,
    path = "/api/company/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "The company's jobs", body = ApiResponse<PagedResponse<Job>>)
    )
)]
#[axum::debug_handler]
pub async fn list_company_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state.job_service.list_for_company(user.id, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

#[utoipa::path(
    get,
    path = "/api/company/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = ApiResponse<Job>),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_company_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_owned(id, user.id).await?;
    Ok(Json(ApiResponse::ok(job)))
}

#[utoipa::path(
    patch,
    path = "/api/company/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job updated", body = ApiResponse<Job>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(id, user.id, payload).await?;
    Ok(Json(ApiResponse::ok(job)))
}

#[utoipa::path(
    delete,
    path = "/api/company/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/company/jobs/{id}/board",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Applications grouped by status", body = ApiResponse<JobBoardResponse>),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job_board(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let board = state.application_service.board(id, user.id).await?;
    Ok(Json(ApiResponse::ok(board)))
}
