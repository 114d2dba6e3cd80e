use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::order::{Order, OrderLine, OrderStatus};
use crate::domain::types::{CustomerId, ProductId, Quantity};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// New order form. Lines arrive as repeated `product_id`/`quantity` pairs;
/// rows whose product is left blank are ignored.
pub struct OrderForm {
    pub customer_id: Option<i64>,
    #[validate(length(min = 1))]
    pub order_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub product_id: Vec<String>,
    #[serde(default)]
    pub quantity: Vec<String>,
}

pub struct OrderLinePayload {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

pub struct OrderPayload {
    pub customer_id: CustomerId,
    pub order_date: NaiveDate,
    pub status: OrderStatus,
    pub lines: Vec<OrderLinePayload>,
}

impl OrderPayload {
    /// Validates the form against `today`, the latest acceptable order date.
    pub fn from_form(form: OrderForm, today: NaiveDate) -> Result<Self, FormError> {
        form.validate()?;

        let customer_id = form.customer_id.ok_or(FormError::EmptyField("customer"))?;
        let customer_id = CustomerId::new(customer_id).map_err(|_| FormError::InvalidId)?;

        let raw_date = form.order_date.trim();
        let order_date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(raw_date.to_string()))?;
        if order_date > today {
            return Err(FormError::FutureDate);
        }

        let status = match form.status.as_deref().map(str::trim) {
            None | Some("") => OrderStatus::default(),
            Some(value) => value.parse()?,
        };

        let mut lines = Vec::new();
        for (index, product) in form.product_id.iter().enumerate() {
            let product = product.trim();
            if product.is_empty() {
                continue;
            }
            let product_id = product
                .parse::<i64>()
                .ok()
                .and_then(|id| ProductId::new(id).ok())
                .ok_or(FormError::InvalidId)?;
            let quantity = form
                .quantity
                .get(index)
                .and_then(|value| value.trim().parse::<i64>().ok())
                .and_then(|value| Quantity::new(value).ok())
                .ok_or(FormError::InvalidQuantity)?;
            lines.push(OrderLinePayload {
                product_id,
                quantity,
            });
        }
        if lines.is_empty() {
            return Err(FormError::EmptyOrder);
        }

        Ok(Self {
            customer_id,
            order_date,
            status,
            lines,
        })
    }

    pub fn into_domain(self) -> Order {
        Order {
            id: None,
            order_date: self.order_date,
            status: self.status,
            customer_id: self.customer_id,
            lines: self
                .lines
                .into_iter()
                .map(|line| OrderLine {
                    product_id: line.product_id,
                    quantity: line.quantity.get(),
                    unit_price: None,
                    line_total: None,
                })
                .collect(),
            total_amount: None,
        }
    }
}
