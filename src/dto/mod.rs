pub mod admin_dto;
pub mod api_response;
pub mod application_dto;
pub mod job_dto;
pub mod mock_test_dto;
pub mod notification_dto;
pub mod support_dto;
