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
    dto::application_dto::{ApplyPayload, UpdateApplicationStatusPayload},
    error::Result,
    middleware::auth::AuthUser,
    utils::pagination::PageQuery,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/candidate/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = ApiResponse<JobApplication>),
        (status = 400, description = "Job is closed or payload invalid"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.apply(user.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(application, "Application submitted")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/candidate/applications",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "The candidate's applications", body = ApiResponse<PagedResponse<ApplicationDetail>>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .application_service
        .list_for_candidate(user.id, query)
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

#[utoipa::path(
    patch,
    path = "/api/company/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusPayload,
    responses(
        (status = 200, description = "Application moved", body = ApiResponse<ApplicationDetail>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Application belongs to another company's job"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .update_status(id, user.id, payload)
        .await?;
    Ok(Json(ApiResponse::ok(application)))
}
