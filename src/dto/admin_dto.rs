use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_candidates: i64,
    pub total_companies: i64,
    pub open_jobs: i64,
    pub total_applications: i64,
    pub applications_by_status: BTreeMap<String, i64>,
    pub total_mock_tests: i64,
    pub completed_test_results: i64,
    pub open_support_tickets: i64,
}
