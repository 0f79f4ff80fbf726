pub mod admin;
pub mod applications;
pub mod candidate_tests;
pub mod health;
pub mod jobs;
pub mod notifications;
pub mod support;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;

use crate::middleware::auth::{require_admin, require_bearer_auth, require_candidate, require_company};
use crate::middleware::rate_limit::{new_rps_state, rps_middleware};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        jobs::get_public_job,
        jobs::list_job_mock_tests,
        jobs::create_job,
        jobs::list_company_jobs,
        jobs::get_company_job,
        jobs::update_job,
        jobs::delete_job,
        jobs::get_job_board,
        applications::apply,
        applications::list_my_applications,
        applications::update_application_status,
        mock_tests::create_mock_test,
        mock_tests::list_mock_tests,
        mock_tests::get_mock_test,
        mock_tests::update_mock_test,
        mock_tests::delete_mock_test,
        mock_tests::get_ranked_results,
        mock_tests::export_ranked_results,
        candidate_tests::get_test,
        candidate_tests::start_test,
        candidate_tests::submit_test,
        candidate_tests::get_my_result,
        candidate_tests::list_my_results,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read,
        notifications::mark_all_read,
        support::create_ticket,
        support::list_my_tickets,
        support::get_my_ticket,
        support::admin_list_tickets,
        support::admin_respond_ticket,
        admin::get_dashboard,
    ),
    info(title = "Job Portal API", description = "Jobs, applications, mock tests and support")
)]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Every route of the service with auth gates and the request-rate limiter.
/// Transport layers (trace, CORS, body limit) are added by the binary.
pub fn build_router(state: AppState) -> Router {
    let config = crate::config::get_config();

    let public_api = Router::new()
        .route("/api/jobs/:id", get(jobs::get_public_job))
        .route("/api/jobs/:id/mock-tests", get(jobs::list_job_mock_tests));

    let company_api = Router::new()
        .route(
            "/api/company/jobs",
            post(jobs::create_job).get(jobs::list_company_jobs),
        )
        .route(
            "/api/company/jobs/:id",
            get(jobs::get_company_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/api/company/jobs/:id/board", get(jobs::get_job_board))
        .route(
            "/api/company/applications/:id/status",
            patch(applications::update_application_status),
        )
        .route(
            "/api/company/mock-tests",
            post(mock_tests::create_mock_test).get(mock_tests::list_mock_tests),
        )
        .route(
            "/api/company/mock-tests/:id",
            get(mock_tests::get_mock_test)
                .patch(mock_tests::update_mock_test)
                .delete(mock_tests::delete_mock_test),
        )
        .route(
            "/api/company/mock-tests/:id/results",
            get(mock_tests::get_ranked_results),
        )
        .route(
            "/api/company/mock-tests/:id/results/export",
            get(mock_tests::export_ranked_results),
        )
        .route_layer(from_fn(require_company));

    let candidate_api = Router::new()
        .route(
            "/api/candidate/applications",
            post(applications::apply).get(applications::list_my_applications),
        )
        .route("/api/candidate/mock-tests/:id", get(candidate_tests::get_test))
        .route(
            "/api/candidate/mock-tests/:id/start",
            post(candidate_tests::start_test),
        )
        .route(
            "/api/candidate/mock-tests/:id/submit",
            post(candidate_tests::submit_test),
        )
        .route(
            "/api/candidate/mock-tests/:id/result",
            get(candidate_tests::get_my_result),
        )
        .route("/api/candidate/results", get(candidate_tests::list_my_results))
        .route_layer(from_fn(require_candidate));

    let account_api = Router::new()
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/unread-count",
            get(notifications::unread_count),
        )
        .route("/api/notifications/:id/read", patch(notifications::mark_read))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route(
            "/api/support/tickets",
            post(support::create_ticket).get(support::list_my_tickets),
        )
        .route("/api/support/tickets/:id", get(support::get_my_ticket))
        .route_layer(from_fn(require_bearer_auth));

    let admin_api = Router::new()
        .route("/api/admin/dashboard", get(admin::get_dashboard))
        .route(
            "/api/admin/support/tickets",
            get(support::admin_list_tickets),
        )
        .route(
            "/api/admin/support/tickets/:id",
            patch(support::admin_respond_ticket),
        )
        .route_layer(from_fn(require_admin));

    let api = public_api
        .merge(company_api)
        .merge(candidate_api)
        .merge(account_api)
        .merge(admin_api)
        .layer(from_fn_with_state(
            new_rps_state(config.api_rps),
            rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/docs/openapi.json", get(openapi_json))
        .merge(api)
        .with_state(state)
}
