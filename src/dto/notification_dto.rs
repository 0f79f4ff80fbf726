use serde::{Deserialize, Serialize};

use crate::utils::pagination::PageQuery;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub unread_only: Option<bool>,
}

impl NotificationListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedReadResponse {
    pub updated: u64,
}
