use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TICKET_PRIORITIES: [&str; 3] = ["Low", "Medium", "High"];
pub const TICKET_STATUSES: [&str; 4] = ["Open", "In Progress", "Resolved", "Closed"];
pub const TICKET_STATUS_OPEN: &str = "Open";
pub const TICKET_STATUS_RESOLVED: &str = "Resolved";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: Uuid,
    pub submitter_id: Uuid,
    pub submitter_role: String,
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub admin_response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Case-insensitive lookup returning the canonical spelling.
pub fn canonical<'a>(allowed: &[&'a str], value: &str) -> Option<&'a str> {
    allowed
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(value.trim()))
}
