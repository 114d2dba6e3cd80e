use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::listing::ListQuery;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{base_context, failure_redirect, load_failure, redirect, render_template};
use crate::services::products as products_service;

#[get("/products")]
pub async fn show_products(
    query: web::Query<ListQuery>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = products_service::list_products(
        repo.get_ref(),
        &query,
        server_config.default_page_size,
    )
    .await;

    let mut context = base_context(&flash_messages, "products");
    context.insert("products", &data.products);
    context.insert("subcategories", &data.subcategories);

    render_template(&tera, "products/index.html", &context)
}

async fn render_form(
    product_id: Option<i64>,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match products_service::load_product(repo, product_id).await {
        Ok(data) => {
            let mut context = base_context(flash_messages, "products");
            context.insert("product", &data.product);
            context.insert("subcategories", &data.subcategories);
            render_template(tera, "products/edit.html", &context)
        }
        Err(err) => load_failure(err, "Product", "/products"),
    }
}

#[get("/products/new")]
pub async fn new_product(
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(None, repo.get_ref(), &flash_messages, &tera).await
}

#[get("/products/{product_id}/edit")]
pub async fn edit_product(
    product_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        Some(product_id.into_inner()),
        repo.get_ref(),
        &flash_messages,
        &tera,
    )
    .await
}

#[post("/products/save")]
pub async fn save_product(repo: web::Data<RestRepository>, body: web::Bytes) -> impl Responder {
    match products_service::save_product(repo.get_ref(), &body).await {
        Ok(product) => {
            FlashMessage::success(format!("Product {} saved.", product.sku)).send();
            redirect("/products")
        }
        Err(err) => failure_redirect(err, "save product", "/products"),
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    match products_service::delete_product(repo.get_ref(), product_id.into_inner()).await {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
            redirect("/products")
        }
        Err(err) => failure_redirect(err, "delete product", "/products"),
    }
}
