use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::cache::CacheKey;
use crate::pagination::PageInfo;
use crate::query::QueryError;
use crate::query::criteria::{SearchConfig, SearchCriteria};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl Display for Sort {
    /// Backend wire format: `field,direction`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.field, self.direction.as_str())
    }
}

impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (s.trim(), "asc"),
        };
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(QueryError::InvalidSort(s.to_string()));
        }
        let direction = match direction.to_ascii_lowercase().as_str() {
            "" | "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(QueryError::InvalidSort(s.to_string())),
        };
        Ok(Sort::new(field, direction))
    }
}

/// Filter and pagination state of one list view.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryState {
    /// Zero-based page index.
    pub page: usize,
    pub size: usize,
    pub sort: Option<Sort>,
    pub criteria: Option<SearchCriteria>,
}

/// Canonical description of one backend list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Path relative to the API root, e.g. `addresses/search`.
    pub path: String,
    pub page: usize,
    pub size: usize,
    pub sort: Option<Sort>,
    /// Criteria parameters in stable order.
    pub filters: Vec<(String, String)>,
}

impl ListRequest {
    /// Every query pair sent to the backend.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.to_string()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }

    pub fn cache_key(&self) -> String {
        let mut key = CacheKey::new(&self.path);
        if let Some(sort) = &self.sort {
            key = key.filter("sort", sort.to_string());
        }
        for (name, value) in &self.filters {
            key = key.filter(name, value);
        }
        key.page(self.page, self.size).to_string()
    }
}

/// Owns the [`QueryState`] of a list view and applies user transitions to it.
///
/// Every transition returns the complete new state, so a request is never
/// built from a half-updated one.
#[derive(Debug, Clone)]
pub struct QueryStateManager {
    config: SearchConfig,
    state: QueryState,
    /// Total element count reported by the last known result.
    known_total: Option<usize>,
}

impl QueryStateManager {
    pub fn new(config: SearchConfig, size: usize) -> Self {
        Self {
            config,
            state: QueryState {
                page: 0,
                size: size.max(1),
                sort: None,
                criteria: None,
            },
            known_total: None,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn current_state(&self) -> &QueryState {
        &self.state
    }

    /// Starts a new search on the first page, keeping size and sort.
    ///
    /// Blank criteria degrade to [`Self::clear_search`] unless the view allows
    /// filterless listing.
    pub fn apply_search(&mut self, criteria: SearchCriteria) -> &QueryState {
        let criteria = criteria.normalized(&self.config);
        if criteria.is_blank() && !self.config.allow_filterless {
            return self.clear_search();
        }
        self.state.criteria = Some(criteria);
        self.state.page = 0;
        &self.state
    }

    pub fn clear_search(&mut self) -> &QueryState {
        self.state.criteria = None;
        self.state.page = 0;
        &self.state
    }

    /// Moves to `page` with `size`, clamping to the last page proven to exist
    /// by the last known result.
    ///
    /// A page whose items lie past `i64::MAX` is rejected.
    pub fn set_page(&mut self, requested: i64, size: i64) -> Result<&QueryState, QueryError> {
        if requested < 0 {
            return Err(QueryError::NegativePage(requested));
        }
        let size = usize::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(QueryError::InvalidPageSize(size))?;
        let mut page =
            usize::try_from(requested).map_err(|_| QueryError::NegativePage(requested))?;

        if let Some(total) = self.known_total {
            let last_page = total.div_ceil(size).saturating_sub(1);
            page = page.min(last_page);
        }

        let end_item = page
            .checked_add(1)
            .and_then(|pages| pages.checked_mul(size))
            .filter(|end| i64::try_from(*end).is_ok());
        if end_item.is_none() {
            return Err(QueryError::PageOutOfRange(requested));
        }

        self.state.page = page;
        self.state.size = size;
        Ok(&self.state)
    }

    /// Changes the sort order and returns to the first page.
    pub fn set_sort(&mut self, sort: Option<Sort>) -> &QueryState {
        self.state.sort = sort;
        self.state.page = 0;
        &self.state
    }

    /// Records the totals of a result so later page moves can be clamped.
    pub fn observe(&mut self, info: &PageInfo) {
        self.known_total = Some(info.total_elements);
    }

    pub fn known_total(&self) -> Option<usize> {
        self.known_total
    }

    /// Derives the backend request for the current state.
    pub fn request(&self) -> ListRequest {
        let path = match &self.state.criteria {
            Some(_) if self.config.search_endpoint => format!("{}/search", self.config.resource),
            _ => self.config.resource.to_string(),
        };
        ListRequest {
            path,
            page: self.state.page,
            size: self.state.size,
            sort: self.state.sort.clone(),
            filters: self
                .state
                .criteria
                .as_ref()
                .map(SearchCriteria::params)
                .unwrap_or_default(),
        }
    }
}
