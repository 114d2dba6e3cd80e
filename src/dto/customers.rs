//! DTOs used by the customer pages.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::address::Address;
use crate::domain::customer::Customer;
use crate::dto::listing::ListPage;

/// Data required to render the customers table.
#[derive(Debug, Serialize)]
pub struct CustomersPageData {
    pub customers: ListPage<Customer>,
    /// One-line address labels keyed by address id.
    pub address_labels: HashMap<String, String>,
}

/// Data required to render the customer edit form.
#[derive(Debug, Serialize)]
pub struct CustomerFormData {
    pub customer: Customer,
    /// Linked address, shown next to the address id field.
    pub address: Option<Address>,
}
