//! Actix-web handlers of the console and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

pub mod addresses;
pub mod categories;
pub mod customers;
pub mod main;
pub mod orders;
pub mod products;
pub mod statistics;

/// Maps a flash message level to the bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page starts from: pending alerts and the active menu item.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Turns a failed mutation into a flash message and a redirect to `location`.
///
/// Only errors the user cannot act on end in a 500.
fn failure_redirect(err: ServiceError, action: &str, location: &str) -> HttpResponse {
    match err {
        ServiceError::Form(message) => {
            log::warn!("Rejected input while trying to {action}: {message}");
            FlashMessage::error(message).send();
            redirect(location)
        }
        ServiceError::NotFound | ServiceError::Repository(RepositoryError::NotFound) => {
            FlashMessage::error("The requested record no longer exists.").send();
            redirect(location)
        }
        ServiceError::Repository(RepositoryError::Rejected { message, .. }) => {
            FlashMessage::error(format!("Failed to {action}: {message}")).send();
            redirect(location)
        }
        ServiceError::Repository(err) => {
            FlashMessage::error(format!("Failed to {action}: {err}")).send();
            redirect(location)
        }
        err => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Response of a page that could not be loaded.
fn load_failure(err: ServiceError, what: &str, location: &str) -> HttpResponse {
    match err {
        ServiceError::NotFound | ServiceError::Repository(RepositoryError::NotFound) => {
            FlashMessage::error(format!("{what} not found.")).send();
            redirect(location)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(location)
        }
        ServiceError::Repository(err) => {
            log::error!("Failed to load {what}: {err}");
            FlashMessage::error(format!("Failed to load {what}")).send();
            redirect(location)
        }
        err => {
            log::error!("Failed to load {what}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
