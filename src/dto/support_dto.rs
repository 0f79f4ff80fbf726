use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::pagination::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketPayload {
    #[validate(length(min = 3, max = 200, message = "Subject must be 3-200 characters"))]
    pub subject: String,
    #[validate(length(min = 10, message = "Please describe the problem in at least 10 characters"))]
    pub description: String,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct RespondTicketPayload {
    #[validate(length(min = 1))]
    pub response: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct TicketListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<String>,
}

impl TicketListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}
