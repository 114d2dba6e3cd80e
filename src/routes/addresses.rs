use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::listing::ListQuery;
use crate::models::config::ServerConfig;
use crate::repository::RestRepository;
use crate::routes::{base_context, failure_redirect, load_failure, redirect, render_template};
use crate::services::addresses as addresses_service;

#[get("/addresses")]
pub async fn show_addresses(
    query: web::Query<ListQuery>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let addresses = addresses_service::list_addresses(
        repo.get_ref(),
        &query,
        server_config.default_page_size,
    )
    .await;

    let mut context = base_context(&flash_messages, "addresses");
    context.insert("addresses", &addresses);

    render_template(&tera, "addresses/index.html", &context)
}

async fn render_form(
    address_id: Option<i64>,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match addresses_service::load_address(repo, address_id).await {
        Ok(address) => {
            let mut context = base_context(flash_messages, "addresses");
            context.insert("address", &address);
            render_template(tera, "addresses/edit.html", &context)
        }
        Err(err) => load_failure(err, "Address", "/addresses"),
    }
}

#[get("/addresses/new")]
pub async fn new_address(
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(None, repo.get_ref(), &flash_messages, &tera).await
}

#[get("/addresses/{address_id}/edit")]
pub async fn edit_address(
    address_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        Some(address_id.into_inner()),
        repo.get_ref(),
        &flash_messages,
        &tera,
    )
    .await
}

#[post("/addresses/save")]
pub async fn save_address(repo: web::Data<RestRepository>, body: web::Bytes) -> impl Responder {
    match addresses_service::save_address(repo.get_ref(), &body).await {
        Ok(address) => {
            FlashMessage::success(format!("Address {} saved.", address.label())).send();
            redirect("/addresses")
        }
        Err(err) => failure_redirect(err, "save address", "/addresses"),
    }
}

#[post("/addresses/{address_id}/delete")]
pub async fn delete_address(
    address_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    match addresses_service::delete_address(repo.get_ref(), address_id.into_inner()).await {
        Ok(()) => {
            FlashMessage::success("Address deleted.").send();
            redirect("/addresses")
        }
        Err(err) => failure_redirect(err, "delete address", "/addresses"),
    }
}
