use serde::{Deserialize, Serialize};

use crate::config::QueryConfig;

/// Sort direction for list queries. Anything that is not a case-insensitive
/// `desc` means ascending; there is no error path for a bad value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> SortOrder {
        if raw.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw list parameters as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Sanitized list parameters. `sort_key` is always a member of the entity's
/// whitelist, so it is safe to splice into an ORDER BY clause.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub search: String,
    pub sort_key: &'static str,
    pub order: SortOrder,
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl ListQuery {
    /// Resolve against an entity sort-key whitelist. Unknown sort keys fall
    /// back to `id` silently; page and limit are floored at 1 and the limit
    /// is capped by configuration.
    pub fn into_params(self, whitelist: &'static [&'static str], query: &QueryConfig) -> ListParams {
        let sort_key = self
            .sort_by
            .as_deref()
            .and_then(|requested| whitelist.iter().find(|k| **k == requested))
            .copied()
            .unwrap_or("id");

        let order = SortOrder::parse(self.order.as_deref().unwrap_or(""));

        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(query.default_page_limit)
            .clamp(1, query.max_page_limit);

        ListParams {
            search: self.search.unwrap_or_default(),
            sort_key,
            order,
            page,
            limit,
            // page is client-controlled; saturate instead of overflowing
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

/// Pagination metadata returned alongside every paginated result set.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub sort_by: String,
    pub order: SortOrder,
    pub search: String,
}

impl PageMeta {
    pub fn new(params: &ListParams, total: i64) -> Self {
        Self {
            page: params.page,
            limit: params.limit,
            total,
            // ceil(total / limit); limit is always >= 1 here
            pages: (total + params.limit - 1) / params.limit,
            sort_by: params.sort_key.to_string(),
            order: params.order,
            search: params.search.clone(),
        }
    }
}
