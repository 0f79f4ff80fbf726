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
    dto::support_dto::{CreateTicketPayload, RespondTicketPayload, TicketListQuery},
    error::Result,
    middleware::auth::AuthUser,
    utils::pagination::PageQuery,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/support/tickets",
    request_body = CreateTicketPayload,
    responses(
        (status = 201, description = "Ticket opened", body = ApiResponse<SupportTicket>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTicketPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let ticket = state
        .support_service
        .create(user.id, user.role.as_str(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(ticket))))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "The caller's tickets", body = ApiResponse<PagedResponse<SupportTicket>>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_tickets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .support_service
        .list_own(user.id, user.role.as_str(), query)
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

#[utoipa::path(
    get,
    path = "/api/support/tickets/{id}",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket found", body = ApiResponse<SupportTicket>),
        (status = 404, description = "Ticket not found")
    )
)]
#[axum::debug_handler]
pub async fn get_my_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let ticket = state
        .support_service
        .get_own(id, user.id, user.role.as_str())
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

#[utoipa::path(
    get,
    path = "/api/admin/support/tickets",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "All tickets", body = ApiResponse<PagedResponse<SupportTicket>>),
        (status = 400, description = "Unknown status filter")
    )
)]
#[axum::debug_handler]
pub async fn admin_list_tickets(
    State(state): State<AppState>,
    Query(query): Query<TicketListQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .support_service
        .list_all(query.status.as_deref(), query.page_query())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/support/tickets/{id}",
    params(
        ("id" = Uuid, Path, description = "Ticket ID")
    ),
    request_body = RespondTicketPayload,
    responses(
        (status = 200, description = "Ticket updated", body = ApiResponse<SupportTicket>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Ticket not found")
    )
)]
#[axum::debug_handler]
pub async fn admin_respond_ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondTicketPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let ticket = state.support_service.respond(id, payload).await?;
    Ok(Json(ApiResponse::ok(ticket)))
}
