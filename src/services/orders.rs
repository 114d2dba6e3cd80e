use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use futures::future::join_all;

use crate::domain::order::{Order, OrderStatus};
use crate::domain::types::{CustomerId, OrderId};
use crate::dto::listing::ListQuery;
use crate::dto::orders::{NewOrderFormData, OrderDetail, OrderLineView, OrdersPageData};
use crate::forms::orders::{OrderForm, OrderPayload};
use crate::forms::parse_form;
use crate::query::{CUSTOMER_SEARCH, ORDER_SEARCH, PRODUCT_SEARCH, QueryStateManager, Sort, SortDirection};
use crate::repository::{CustomerReader, OrderReader, OrderWriter, ProductReader};
use crate::services::listing::load_list;
use crate::services::{ServiceError, ServiceResult, existing_id};

/// Number of customers and products offered by the new order form.
const CHOICES_LIMIT: usize = 100;

/// Loads one page of the orders table with the names of its customers.
pub async fn list_orders<R>(repo: &R, query: &ListQuery, default_size: usize) -> OrdersPageData
where
    R: OrderReader + CustomerReader + ?Sized,
{
    let orders = load_list(ORDER_SEARCH, query, default_size, |request| async move {
        repo.list_orders(&request).await
    })
    .await;

    let customer_ids: BTreeSet<CustomerId> = orders
        .list
        .items
        .iter()
        .map(|order| order.customer_id)
        .collect();
    let lookups = join_all(customer_ids.into_iter().map(|id| async move {
        (id, repo.get_customer(id).await)
    }))
    .await;

    let customer_names = lookups
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(Some(customer)) => Some((id.to_string(), customer.full_name())),
            Ok(None) => None,
            Err(err) => {
                log::warn!("Failed to load customer {id}: {err}");
                None
            }
        })
        .collect::<HashMap<_, _>>();

    OrdersPageData {
        orders,
        customer_names,
    }
}

/// Loads an order with its customer and the products of its lines.
pub async fn load_order<R>(repo: &R, order_id: i64) -> ServiceResult<OrderDetail>
where
    R: OrderReader + CustomerReader + ProductReader + ?Sized,
{
    let order = repo
        .get_order(existing_id(order_id, OrderId::new)?)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let customer = repo.get_customer(order.customer_id).await?;

    let products = join_all(
        order
            .lines
            .iter()
            .map(|line| async move { repo.get_product(line.product_id).await }),
    )
    .await;

    let mut lines = Vec::with_capacity(order.lines.len());
    for (line, product) in order.lines.iter().zip(products) {
        let product = product?;
        lines.push(OrderLineView {
            product_id: line.product_id.get(),
            product_name: product.as_ref().map(|p| p.name.clone()),
            sku: product.as_ref().map(|p| p.sku.clone()),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total: line
                .line_total
                .or_else(|| line.unit_price.map(|price| price * f64::from(line.quantity))),
        });
    }

    Ok(OrderDetail {
        total: order.total(),
        order,
        customer,
        lines,
    })
}

/// Customers and active products offered by the new order form.
pub async fn load_new_order_form<R>(repo: &R, today: NaiveDate) -> ServiceResult<NewOrderFormData>
where
    R: CustomerReader + ProductReader + ?Sized,
{
    let mut customers = QueryStateManager::new(CUSTOMER_SEARCH, CHOICES_LIMIT);
    customers.set_sort(Some(Sort::new("lastName", SortDirection::Asc)));
    let mut products = QueryStateManager::new(PRODUCT_SEARCH, CHOICES_LIMIT);
    products.set_sort(Some(Sort::new("name", SortDirection::Asc)));

    let customers = repo.list_customers(&customers.request()).await?.content;
    let products = repo
        .list_products(&products.request())
        .await?
        .content
        .into_iter()
        .filter(|product| product.active)
        .collect();

    Ok(NewOrderFormData {
        customers,
        products,
        statuses: OrderStatus::ALL,
        today: today.format("%Y-%m-%d").to_string(),
    })
}

/// Validates the submitted order against `today` and places it.
pub async fn create_order<R>(repo: &R, body: &[u8], today: NaiveDate) -> ServiceResult<Order>
where
    R: OrderWriter + CustomerReader + ProductReader + ?Sized,
{
    let form: OrderForm = parse_form(body)?;
    let order = OrderPayload::from_form(form, today)?.into_domain();

    if repo.get_customer(order.customer_id).await?.is_none() {
        return Err(ServiceError::Form(format!(
            "Customer {} does not exist",
            order.customer_id
        )));
    }

    let products = join_all(
        order
            .lines
            .iter()
            .map(|line| async move { (line.product_id, repo.get_product(line.product_id).await) }),
    )
    .await;
    for (product_id, product) in products {
        match product? {
            Some(product) if product.active => {}
            Some(_) => {
                return Err(ServiceError::Form(format!(
                    "Product {product_id} is not active"
                )));
            }
            None => {
                return Err(ServiceError::Form(format!(
                    "Product {product_id} does not exist"
                )));
            }
        }
    }

    repo.create_order(&order).await.map_err(|err| {
        log::error!("Failed to create order: {err}");
        ServiceError::from(err)
    })
}

pub async fn delete_order<R>(repo: &R, order_id: i64) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    let order_id = existing_id(order_id, OrderId::new)?;
    repo.delete_order(order_id).await.map_err(|err| {
        log::error!("Failed to delete order {order_id}: {err}");
        ServiceError::from(err)
    })
}
