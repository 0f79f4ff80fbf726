use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::api_response::ApiResponse,
    dto::mock_test_dto::SubmitTestPayload,
    error::Result,
    middleware::auth::AuthUser,
    utils::pagination::PageQuery,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidate/mock-tests/{id}",
    params(
        ("id" = Uuid, Path, description = "Mock test ID")
    ),
    responses(
        (status = 200, description = "Test questions without the answer key", body = ApiResponse<CandidateTestView>),
        (status = 403, description = "Candidate is not shortlisted for the job"),
        (status = 404, description = "Mock test not found")
    )
)]
#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let view = state.test_service.get_test_for_candidate(id, user.id).await?;
    Ok(Json(ApiResponse::ok(view)))
}

#[utoipa::path(
    post,
    path = "/api/candidate/mock-tests/{id}/start",
    params(
        ("id" = Uuid, Path, description = "Mock test ID")
    ),
    responses(
        (status = 201, description = "Attempt started", body = ApiResponse<TestResultResponse>),
        (status = 403, description = "Candidate is not shortlisted for the job"),
        (status = 404, description = "Mock test not found"),
        (status = 409, description = "Attempt already exists")
    )
)]
#[axum::debug_handler]
pub async fn start_test(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state.test_service.start_test(id, user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(result, "Test started")),
    ))
}

#[utoipa::path(
    post,
    path = "/api/candidate/mock-tests/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Mock test ID")
    ),
    request_body = SubmitTestPayload,
    responses(
        (status = 200, description = "Attempt graded", body = ApiResponse<TestResultResponse>),
        (status = 404, description = "Attempt not started"),
        (status = 409, description = "Attempt already submitted")
    )
)]
#[axum::debug_handler]
pub async fn submit_test(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitTestPayload>,
) -> Result<impl IntoResponse> {
    let result = state.test_service.submit_test(id, user.id, payload).await?;
    Ok(Json(ApiResponse::ok_with_message(result, "Test submitted")))
}

#[utoipa::path(
    get,
    path = "/api/candidate/mock-tests/{id}/result",
    params(
        ("id" = Uuid, Path, description = "Mock test ID")
    ),
    responses(
        (status = 200, description = "The caller's attempt", body = ApiResponse<TestResultResponse>),
        (status = 404, description = "No attempt for this test")
    )
)]
#[axum::debug_handler]
pub async fn get_my_result(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let result = state.test_service.get_my_result(id, user.id).await?;
    Ok(Json(ApiResponse::ok(result)))
}

#[utoipa::path(
    get,
    path = "/api/candidate/results",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "The caller's attempts", body = ApiResponse<PagedResponse<TestResultResponse>>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_results(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state.test_service.list_my_results(user.id, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}
