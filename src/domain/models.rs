use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One row of browsing activity. The URL is the sole identity: re-recording
/// the same URL updates the row instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub url: String,
    pub title: Option<String>,
    pub last_visited_time: i64,
    pub num_visits: i64,
    pub locale: Option<String>,
}

/// Optional constraints narrowing a history query. Request-scoped, never
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilters {
    pub keyword: Option<String>,
    pub locale: Option<String>,
    pub time_range: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// A validated page window: `page` is 1-based, `page_size` is 1..=100.
/// Construction is the request-validation boundary; everything downstream
/// may assume the bounds hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub const MAX_PAGE_SIZE: i64 = 100;

    pub fn new(page: i64, page_size: i64) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidPage);
        }
        if !(1..=Self::MAX_PAGE_SIZE).contains(&page_size) {
            return Err(Error::InvalidPageSize);
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// One bounded slice of matching records. `total` is the full match count
/// under the same filter, independent of the slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub items: Vec<VisitRecord>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Activity summary over a time window. `distinct_sites` counts distinct
/// URLs; `top_entities` ranks extracted site identities — the two are
/// deliberately different groupings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_visits: i64,
    pub distinct_sites: i64,
    pub top_entities: Vec<String>,
}
