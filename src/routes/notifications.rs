use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::api_response::ApiResponse,
    dto::notification_dto::{MarkedReadResponse, NotificationListQuery, UnreadCountResponse},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("pageSize" = Option<i64>, Query, description = "Items per page"),
        ("unreadOnly" = Option<bool>, Query, description = "Only unread notifications")
    ),
    responses(
        (status = 200, description = "The caller's notifications", body = ApiResponse<PagedResponse<Notification>>)
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .notification_service
        .list(
            user.id,
            user.role.as_str(),
            query.unread_only.unwrap_or(false),
            query.page_query(),
        )
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notification count", body = ApiResponse<UnreadCountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let count = state
        .notification_service
        .unread_count(user.id, user.role.as_str())
        .await?;
    Ok(Json(ApiResponse::ok(UnreadCountResponse { count })))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked read", body = ApiResponse<Notification>),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state
        .notification_service
        .mark_read(id, user.id, user.role.as_str())
        .await?;
    Ok(Json(ApiResponse::ok(notification)))
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked read", body = ApiResponse<MarkedReadResponse>)
    )
)]
#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let updated = state
        .notification_service
        .mark_all_read(user.id, user.role.as_str())
        .await?;
    Ok(Json(ApiResponse::ok(MarkedReadResponse { updated })))
}
