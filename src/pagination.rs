use serde::{Deserialize, Serialize};

/// Page used when none (or garbage) is given.
pub const DEFAULT_PAGE: i64 = 1;
/// Highest page that can be requested.
pub const MAX_PAGE: i64 = 10_000;
/// Page size used when none (or garbage) is given.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest page size.
pub const MAX_LIMIT: i64 = 100;

/// Raw `page`/`limit` query parameters.
///
/// Kept as strings so that unparsable values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

fn parse_or_default(value: Option<&str>, default: i64) -> i64 {
    match value.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) if n >= 1 => n,
        _ => default,
    }
}

impl Pagination {
    pub fn from_params(params: &PageParams) -> Self {
        Self {
            page: parse_or_default(params.page.as_deref(), DEFAULT_PAGE).min(MAX_PAGE),
            limit: parse_or_default(params.limit.as_deref(), DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// A page of results plus the numbers needed to render a pager.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total: i64) -> Self {
        Self {
            data,
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages: pagination.total_pages(total),
        }
    }
}
