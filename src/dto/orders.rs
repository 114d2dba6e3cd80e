//! DTOs used by the order pages.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::Product;
use crate::dto::listing::ListPage;

/// Data required to render the orders table.
#[derive(Debug, Serialize)]
pub struct OrdersPageData {
    pub orders: ListPage<Order>,
    /// Customer full names keyed by customer id.
    pub customer_names: HashMap<String, String>,
}

/// One line of an order as displayed.
#[derive(Debug, Serialize)]
pub struct OrderLineView {
    pub product_id: i64,
    /// `None` when the product no longer exists.
    pub product_name: Option<String>,
    pub sku: Option<String>,
    pub quantity: u32,
    pub unit_price: Option<f64>,
    pub line_total: Option<f64>,
}

/// Data required to render a single order.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub order: Order,
    pub customer: Option<Customer>,
    pub lines: Vec<OrderLineView>,
    pub total: f64,
}

/// Choices offered by the new order form.
#[derive(Debug, Serialize)]
pub struct NewOrderFormData {
    pub customers: Vec<Customer>,
    /// Active products only.
    pub products: Vec<Product>,
    pub statuses: [OrderStatus; 4],
    /// Latest selectable order date, `yyyy-mm-dd`.
    pub today: String,
}
