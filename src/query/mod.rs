//! Search criteria and list query state shared by every list view.

use thiserror::Error;

pub mod criteria;
pub mod state;

pub use criteria::{GENERAL_SEARCH, SearchConfig, SearchCriteria, SearchField};
pub use state::{ListRequest, QueryState, QueryStateManager, Sort, SortDirection};

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Locally detected invalid list input. Never reaches the backend.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QueryError {
    #[error("page index cannot be negative: {0}")]
    NegativePage(i64),
    #[error("unsupported page size: {0}")]
    InvalidPageSize(i64),
    #[error("page {0} is out of range")]
    PageOutOfRange(i64),
    #[error("invalid page number `{0}`")]
    InvalidPageInput(String),
    #[error("invalid sort `{0}`")]
    InvalidSort(String),
}

pub const ADDRESS_SEARCH: SearchConfig = SearchConfig {
    resource: "addresses",
    search_types: &[
        SearchField {
            value: GENERAL_SEARCH,
            label: "All fields",
        },
        SearchField {
            value: "city",
            label: "City",
        },
        SearchField {
            value: "state",
            label: "State",
        },
        SearchField {
            value: "postalCode",
            label: "Postal code",
        },
    ],
    filters: &["city", "state", "postalCode"],
    allow_filterless: false,
    search_endpoint: true,
    placeholder: "Search addresses...",
};

pub const CUSTOMER_SEARCH: SearchConfig = SearchConfig {
    resource: "customers",
    search_types: &[
        SearchField {
            value: GENERAL_SEARCH,
            label: "All fields",
        },
        SearchField {
            value: "email",
            label: "Email",
        },
        SearchField {
            value: "name",
            label: "Name",
        },
        SearchField {
            value: "city",
            label: "City",
        },
    ],
    filters: &["email", "name", "city"],
    allow_filterless: false,
    search_endpoint: true,
    placeholder: "Search customers...",
};

/// Products only filter by subcategory on the collection endpoint itself.
pub const PRODUCT_SEARCH: SearchConfig = SearchConfig {
    resource: "products",
    search_types: &[],
    filters: &["subCategoryId"],
    allow_filterless: true,
    search_endpoint: false,
    placeholder: "Filter products...",
};

pub const ORDER_SEARCH: SearchConfig = SearchConfig {
    resource: "orders",
    search_types: &[],
    filters: &[],
    allow_filterless: true,
    search_endpoint: false,
    placeholder: "",
};
