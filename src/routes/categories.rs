use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::repository::RestRepository;
use crate::routes::{base_context, failure_redirect, load_failure, redirect, render_template};
use crate::services::catalog as catalog_service;

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<i64>,
}

fn catalog_location(category_id: Option<i64>) -> String {
    match category_id {
        Some(id) => format!("/categories?category={id}"),
        None => "/categories".to_string(),
    }
}

#[get("/categories")]
pub async fn show_categories(
    query: web::Query<CategoryQuery>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match catalog_service::load_catalog(repo.get_ref(), query.category).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("categories", &data.categories);
            context.insert("selected", &data.selected);
            context.insert("subcategories", &data.subcategories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(err) => load_failure(err, "Product categories", "/"),
    }
}

async fn render_category_form(
    category_id: Option<i64>,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match catalog_service::load_category(repo, category_id).await {
        Ok(category) => {
            let mut context = base_context(flash_messages, "categories");
            context.insert("category", &category);
            render_template(tera, "categories/category.html", &context)
        }
        Err(err) => load_failure(err, "Category", "/categories"),
    }
}

#[get("/categories/new")]
pub async fn new_category(
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_category_form(None, repo.get_ref(), &flash_messages, &tera).await
}

#[get("/categories/{category_id}/edit")]
pub async fn edit_category(
    category_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_category_form(
        Some(category_id.into_inner()),
        repo.get_ref(),
        &flash_messages,
        &tera,
    )
    .await
}

#[post("/categories/save")]
pub async fn save_category(repo: web::Data<RestRepository>, body: web::Bytes) -> impl Responder {
    match catalog_service::save_category(repo.get_ref(), &body).await {
        Ok(category) => {
            FlashMessage::success(format!("Category {} saved.", category.name)).send();
            redirect(&catalog_location(category.id.map(|id| id.get())))
        }
        Err(err) => failure_redirect(err, "save category", "/categories"),
    }
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    match catalog_service::delete_category(repo.get_ref(), category_id.into_inner()).await {
        Ok(()) => {
            FlashMessage::success("Category deleted.").send();
            redirect("/categories")
        }
        Err(err) => failure_redirect(err, "delete category", "/categories"),
    }
}

async fn render_subcategory_form(
    subcategory_id: Option<i64>,
    category_id: Option<i64>,
    repo: &RestRepository,
    flash_messages: &IncomingFlashMessages,
    tera: &Tera,
) -> HttpResponse {
    match catalog_service::load_subcategory(repo, subcategory_id, category_id).await {
        Ok(data) => {
            let mut context = base_context(flash_messages, "categories");
            context.insert("subcategory", &data.subcategory);
            context.insert("category_id", &data.category_id);
            context.insert("categories", &data.categories);
            render_template(tera, "categories/subcategory.html", &context)
        }
        Err(err) => load_failure(err, "Subcategory", &catalog_location(category_id)),
    }
}

#[get("/subcategories/new")]
pub async fn new_subcategory(
    query: web::Query<CategoryQuery>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_subcategory_form(None, query.category, repo.get_ref(), &flash_messages, &tera).await
}

#[get("/subcategories/{subcategory_id}/edit")]
pub async fn edit_subcategory(
    subcategory_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_subcategory_form(
        Some(subcategory_id.into_inner()),
        None,
        repo.get_ref(),
        &flash_messages,
        &tera,
    )
    .await
}

#[post("/subcategories/save")]
pub async fn save_subcategory(
    repo: web::Data<RestRepository>,
    body: web::Bytes,
) -> impl Responder {
    match catalog_service::save_subcategory(repo.get_ref(), &body).await {
        Ok(subcategory) => {
            FlashMessage::success(format!("Subcategory {} saved.", subcategory.name)).send();
            redirect(&catalog_location(Some(subcategory.category_id.get())))
        }
        Err(err) => failure_redirect(err, "save subcategory", "/categories"),
    }
}

#[post("/subcategories/{subcategory_id}/delete")]
pub async fn delete_subcategory(
    subcategory_id: web::Path<i64>,
    repo: web::Data<RestRepository>,
) -> impl Responder {
    match catalog_service::delete_subcategory(repo.get_ref(), subcategory_id.into_inner()).await {
        Ok(category_id) => {
            FlashMessage::success("Subcategory deleted.").send();
            redirect(&catalog_location(category_id.map(|id| id.get())))
        }
        Err(err) => failure_redirect(err, "delete subcategory", "/categories"),
    }
}
