use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::listing::ListQuery;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{base_context, failure_redirect, load_failure, redirect, render_template};
use crate::services::customers as customers_service;

#[get("/customers")]
pub async fn show_customers(
    query: web::Query<ListQuery>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = customers_service::list_customers(
        repo.get_ref(),
        &query,
        server_config.default_page_size,
    )
    .await;

    let mut context = base_context(&flash_messages, "customers");
    context.insert("customers", &data.customers);
    context.insert("address_labels", &data.address_labels);

    render_template(&tera, "customers/index.html", &context)
}

async fn render_form(
    customer_id: Option<i64>,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match customers_service::load_customer(repo, customer_id).await {
        Ok(data) => {
            let mut context = base_context(flash_messages, "customers");
            context.insert("customer", &data.customer);
            context.insert("address", &data.address);
            render_template(tera, "customers/edit.html", &context)
        }
        Err(err) => load_failure(err, "Customer", "/customers"),
    }
}

#[get("/customers/new")]
pub async fn new_customer(
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(None, repo.get_ref(), &flash_messages, &tera).await
}

#[get("/customers/{customer_id}/edit")]
pub async fn edit_customer(
    customer_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        Some(customer_id.into_inner()),
        repo.get_ref(),
        &flash_messages,
        &tera,
    )
    .await
}

#[post("/customers/save")]
pub async fn save_customer(repo: web::Data<RestRepository>, body: web::Bytes) -> impl Responder {
    match customers_service::save_customer(repo.get_ref(), &body).await {
        Ok(customer) => {
            FlashMessage::success(format!("Customer {} saved.", customer.full_name())).send();
            redirect("/customers")
        }
        Err(err) => failure_redirect(err, "save customer", "/customers"),
    }
}

#[post("/customers/{customer_id}/delete")]
pub async fn delete_customer(
    customer_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    match customers_service::delete_customer(repo.get_ref(), customer_id.into_inner()).await {
        Ok(()) => {
            FlashMessage::success("Customer deleted.").send();
            redirect("/customers")
        }
        Err(err) => failure_redirect(err, "delete customer", "/customers"),
    }
}
