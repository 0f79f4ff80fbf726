use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn new(current_page: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_items + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            current_page,
            page_size,
            total_pages,
            total_items,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }

    pub fn from_query(query: &PageQuery, total_items: i64) -> Self {
        Self::new(query.page(), query.page_size(), total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_and_clamps() {
        let q = PageQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset(), 0);

        let q = PageQuery {
            page: Some(-3),
            page_size: Some(1_000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), MAX_PAGE_SIZE);

        let q = PageQuery {
            page: Some(3),
            page_size: Some(20),
        };
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn huge_page_number_is_capped() {
        let q = PageQuery {
            page: Some(i64::MAX),
            page_size: Some(10),
        };
        assert_eq!(q.page(), MAX_PAGE);
        assert_eq!(q.offset(), (MAX_PAGE - 1) * 10);

        let q = PageQuery {
            page: Some(i64::MAX),
            page_size: Some(i64::MAX),
        };
        assert!(q.offset() > 0);
    }

    #[test]
    fn page_size_param_is_camel_case() {
        let q: PageQuery = serde_json::from_str(r#"{"page":2,"pageSize":25}"#).unwrap();
        assert_eq!(q.page(), 2);
        assert_eq!(q.page_size(), 25);
    }

    #[test]
    fn pagination_flags() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_previous_page);

        let p = Pagination::new(2, 10, 21);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(p.has_previous_page);

        let p = Pagination::new(3, 10, 21);
        assert!(!p.has_next_page);
    }
}
