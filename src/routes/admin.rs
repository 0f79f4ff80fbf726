use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{dto::api_response::ApiResponse, error::Result, AppState};

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Platform statistics", body = ApiResponse<DashboardStats>)
    )
)]
#[axum::debug_handler]
pub async fn get_dashboard(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.admin_service.dashboard().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
