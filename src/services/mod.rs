pub mod admin_service;
pub mod application_service;
pub mod export_service;
pub mod grading_service;
pub mod job_service;
pub mod mock_test_service;
pub mod notification_service;
pub mod support_service;
pub mod test_service;
