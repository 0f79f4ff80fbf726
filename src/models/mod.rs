pub mod candidate;
pub mod company;
pub mod job;
pub mod job_application;
pub mod notification;
pub mod support_ticket;
pub mod test_result;
