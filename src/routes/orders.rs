use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Local;
use tera::Tera;

use crate::dto::listing::ListQuery;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{base_context, failure_redirect, load_failure, redirect, render_template};
use crate::services::orders as orders_service;

#[get("/orders")]
pub async fn show_orders(
    query: web::Query<ListQuery>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data =
        orders_service::list_orders(repo.get_ref(), &query, server_config.default_page_size).await;

    let mut context = base_context(&flash_messages, "orders");
    context.insert("orders", &data.orders);
    context.insert("customer_names", &data.customer_names);

    render_template(&tera, "orders/index.html", &context)
}

#[get("/orders/new")]
pub async fn new_order(
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let today = Local::now().date_naive();
    match orders_service::load_new_order_form(repo.get_ref(), today).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "orders");
            context.insert("customers", &data.customers);
            context.insert("products", &data.products);
            context.insert("statuses", &data.statuses);
            context.insert("today", &data.today);
            render_template(&tera, "orders/new.html", &context)
        }
        Err(err) => load_failure(err, "order form", "/orders"),
    }
}

#[post("/orders/create")]
pub async fn create_order(repo: web::Data<RestRepository>, body: web::Bytes) -> impl Responder {
    let today = Local::now().date_naive();
    match orders_service::create_order(repo.get_ref(), &body, today).await {
        Ok(order) => {
            FlashMessage::success("Order placed.").send();
            match order.id {
                Some(id) => redirect(&format!("/orders/{id}")),
                None => redirect("/orders"),
            }
        }
        Err(err) => failure_redirect(err, "create order", "/orders/new"),
    }
}

#[get("/orders/{order_id}")]
pub async fn show_order(
    order_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match orders_service::load_order(repo.get_ref(), order_id.into_inner()).await {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, "orders");
            context.insert("order", &detail.order);
            context.insert("customer", &detail.customer);
            context.insert("lines", &detail.lines);
            context.insert("total", &detail.total);
            render_template(&tera, "orders/show.html", &context)
        }
        Err(err) => load_failure(err, "Order", "/orders"),
    }
}

#[post("/orders/{order_id}/delete")]
pub async fn delete_order(order_id: web::Path<i64>, repo: web::Data<RestRepository>) -> impl Responder {
    match orders_service::delete_order(repo.get_ref(), order_id.into_inner()).await {
        Ok(()) => {
            FlashMessage::success("Order deleted.").send();
            redirect("/orders")
        }
        Err(err) => failure_redirect(err, "delete order", "/orders"),
    }
}
