//! Query string and page data shared by every paginated list view.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::pagination::Paginated;
use crate::query::{SearchConfig, SearchCriteria, SearchField, Sort};

/// Query string of a list page.
///
/// All values arrive as strings so that malformed input is reported as a
/// local validation problem instead of a 400. Unknown parameters land in
/// `filters` and are checked against the view's search configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
    /// Zero-based page index.
    pub page: Option<String>,
    pub size: Option<String>,
    /// `field,direction`.
    pub sort: Option<String>,
    /// One-based page number typed into the goto box.
    pub goto: Option<String>,
    /// New page size picked in the size selector.
    pub resize: Option<String>,
    /// Total element count of the page the user was looking at.
    pub total: Option<String>,
    #[serde(flatten)]
    pub filters: HashMap<String, String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl ListQuery {
    pub fn page(&self) -> Option<&str> {
        non_blank(&self.page)
    }

    pub fn size(&self) -> Option<&str> {
        non_blank(&self.size)
    }

    pub fn sort(&self) -> Option<&str> {
        non_blank(&self.sort)
    }

    pub fn goto(&self) -> Option<&str> {
        non_blank(&self.goto)
    }

    pub fn resize(&self) -> Option<&str> {
        non_blank(&self.resize)
    }

    pub fn total(&self) -> Option<&str> {
        non_blank(&self.total)
    }

    /// Search criteria as entered, normalized against `config`.
    pub fn criteria(&self, config: &SearchConfig) -> SearchCriteria {
        let mut criteria = SearchCriteria::new(self.q.clone().unwrap_or_default());
        if let Some(search_type) = non_blank(&self.search_type) {
            criteria = criteria.search_type(search_type);
        }
        for (name, value) in &self.filters {
            criteria = criteria.filter(name, value);
        }
        criteria.normalized(config)
    }
}

/// Search box state echoed back to the template.
#[derive(Debug, Serialize)]
pub struct SearchEcho {
    pub term: String,
    pub search_type: String,
    pub filters: BTreeMap<String, String>,
    pub search_types: &'static [SearchField],
    pub filter_names: &'static [&'static str],
    pub placeholder: &'static str,
    pub active: bool,
}

impl SearchEcho {
    pub fn new(config: &SearchConfig, criteria: Option<&SearchCriteria>) -> Self {
        let criteria = criteria.cloned().unwrap_or_default();
        let search_type = if criteria.search_type.is_empty() {
            config.default_search_type().to_string()
        } else {
            criteria.search_type
        };
        Self {
            active: !criteria.search_term.is_empty() || !criteria.filters.is_empty(),
            term: criteria.search_term,
            search_type,
            filters: criteria.filters,
            search_types: config.search_types,
            filter_names: config.filters,
            placeholder: config.placeholder,
        }
    }
}

/// Everything a list template needs.
#[derive(Debug, Serialize)]
pub struct ListPage<T> {
    pub list: Paginated<T>,
    pub search: SearchEcho,
    pub sort: Option<Sort>,
    /// Criteria pairs to carry over in pager forms.
    pub criteria_params: Vec<(String, String)>,
    /// Urlencoded criteria, without sort.
    pub criteria_query: String,
    /// Urlencoded criteria and sort. Pager links append page and size to it.
    pub base_query: String,
    /// Rejected pager input, reported inline.
    pub notice: Option<String>,
    /// Set when the backend call failed; the table is then empty.
    pub load_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ADDRESS_SEARCH;

    #[test]
    fn query_string_splits_known_fields_from_filters() {
        let query: ListQuery =
            serde_html_form::from_str("q=Main&type=city&page=2&size=10&city=Paris&secret=x&goto=")
                .unwrap();

        assert_eq!(query.page(), Some("2"));
        assert_eq!(query.goto(), None);

        let criteria = query.criteria(&ADDRESS_SEARCH);
        assert_eq!(criteria.search_term, "Main");
        assert_eq!(criteria.search_type, "city");
        assert_eq!(criteria.filters.len(), 1);
        assert_eq!(criteria.filters["city"], "Paris");
    }
}
