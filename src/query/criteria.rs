use std::collections::BTreeMap;

use serde::Serialize;

/// Search type that sends the term as the backend's free-text `q` parameter.
pub const GENERAL_SEARCH: &str = "general";

/// One entry of a view's search-type selector.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SearchField {
    /// Backend query parameter the term is sent as (`general` means `q`).
    pub value: &'static str,
    pub label: &'static str,
}

/// Static search configuration of one list view.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchConfig {
    /// Backend collection path, e.g. `addresses`.
    pub resource: &'static str,
    pub search_types: &'static [SearchField],
    /// Structured filter parameters accepted by the backend.
    pub filters: &'static [&'static str],
    /// Whether the view may list everything without any criteria.
    pub allow_filterless: bool,
    /// Whether criteria are sent to `{resource}/search` or to the collection itself.
    pub search_endpoint: bool,
    pub placeholder: &'static str,
}

impl SearchConfig {
    pub fn default_search_type(&self) -> &'static str {
        self.search_types
            .first()
            .map(|field| field.value)
            .unwrap_or(GENERAL_SEARCH)
    }

    pub fn accepts_search_type(&self, value: &str) -> bool {
        self.search_types.iter().any(|field| field.value == value)
    }

    pub fn accepts_filter(&self, name: &str) -> bool {
        self.filters.contains(&name)
    }
}

/// User-entered constraints narrowing a result set.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SearchCriteria {
    pub search_term: String,
    pub search_type: String,
    pub filters: BTreeMap<String, String>,
}

impl SearchCriteria {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            search_type: GENERAL_SEARCH.to_string(),
            filters: BTreeMap::new(),
        }
    }

    pub fn search_type(mut self, search_type: impl Into<String>) -> Self {
        self.search_type = search_type.into();
        self
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    /// Trims the term and every filter, dropping blank filters as well as
    /// filters and search types the view does not know.
    pub fn normalized(self, config: &SearchConfig) -> Self {
        let search_type = if config.accepts_search_type(&self.search_type) {
            self.search_type
        } else {
            config.default_search_type().to_string()
        };

        let filters = self
            .filters
            .into_iter()
            .filter(|(name, _)| config.accepts_filter(name))
            .map(|(name, value)| (name, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect();

        Self {
            search_term: self.search_term.trim().to_string(),
            search_type,
            filters,
        }
    }

    /// True when neither a term nor a structured filter is set.
    pub fn is_blank(&self) -> bool {
        self.search_term.trim().is_empty() && self.filters.values().all(|v| v.trim().is_empty())
    }

    /// Query pairs contributed by these criteria.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 1);
        if !self.search_term.is_empty() {
            let name = if self.search_type == GENERAL_SEARCH {
                "q"
            } else {
                self.search_type.as_str()
            };
            params.push((name.to_string(), self.search_term.clone()));
        }
        params.extend(
            self.filters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ADDRESS_SEARCH;

    #[test]
    fn normalization_drops_unknown_and_blank_filters() {
        let criteria = SearchCriteria::new("  Main St ")
            .search_type("bogus")
            .filter("city", " Springfield ")
            .filter("state", "  ")
            .filter("password", "x")
            .normalized(&ADDRESS_SEARCH);

        assert_eq!(criteria.search_term, "Main St");
        assert_eq!(criteria.search_type, GENERAL_SEARCH);
        assert_eq!(criteria.filters.len(), 1);
        assert_eq!(criteria.filters["city"], "Springfield");
    }

    #[test]
    fn typed_search_is_sent_under_its_own_parameter() {
        let params = SearchCriteria::new("90210")
            .search_type("postalCode")
            .params();

        assert_eq!(params, vec![("postalCode".to_string(), "90210".to_string())]);
    }

    #[test]
    fn blank_criteria_are_detected() {
        assert!(SearchCriteria::new("   ").is_blank());
        assert!(!SearchCriteria::new("").filter("city", "Paris").is_blank());
    }
}
