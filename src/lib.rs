pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    admin_service::AdminService, application_service::ApplicationService,
    job_service::JobService, mock_test_service::MockTestService,
    notification_service::NotificationService, support_service::SupportService,
    test_service::TestService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub mock_test_service: MockTestService,
    pub test_service: TestService,
    pub notification_service: NotificationService,
    pub support_service: SupportService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let notification_service = NotificationService::new(pool.clone());
        let job_service = JobService::new(pool.clone());
        let application_service =
            ApplicationService::new(pool.clone(), notification_service.clone());
        let mock_test_service = MockTestService::new(pool.clone());
        let test_service = TestService::new(pool.clone());
        let support_service = SupportService::new(pool.clone(), notification_service.clone());
        let admin_service = AdminService::new(pool.clone());

        Self {
            pool,
            job_service,
            application_service,
            mock_test_service,
            test_service,
            notification_service,
            support_service,
            admin_service,
        }
    }
}
