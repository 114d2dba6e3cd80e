//! Retail operations console: paginated list views, edit forms and sales
//! statistics on top of a REST backend.
//!
//! The `data` feature holds the reusable list/query core; `server` adds the
//! actix-web console.

#[cfg(feature = "data")]
pub mod cache;
#[cfg(feature = "data")]
pub mod charts;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod export;
#[cfg(feature = "data")]
pub mod list_view;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod query;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::RestRepository;
    use crate::routes::addresses::{
        delete_address, edit_address, new_address, save_address, show_addresses,
    };
    use crate::routes::categories::{
        delete_category, delete_subcategory, edit_category, edit_subcategory, new_category,
        new_subcategory, save_category, save_subcategory, show_categories,
    };
    use crate::routes::customers::{
        delete_customer, edit_customer, new_customer, save_customer, show_customers,
    };
    use crate::routes::main::show_index;
    use crate::routes::orders::{create_order, delete_order, new_order, show_order, show_orders};
    use crate::routes::products::{
        delete_product, edit_product, new_product, save_product, show_products,
    };
    use crate::routes::statistics::{export_departments, run_report, show_statistics};
    use crate::services::statistics::ReportCache;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let repo = RestRepository::new(
            &server_config.backend_url,
            Duration::from_secs(server_config.request_timeout_secs),
        )
        .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;
        let repo = web::Data::new(repo);

        // Shared by every worker so "Run Report" invalidates what all of them serve.
        let report_cache = web::Data::new(ReportCache::new());

        // Keys and stores for sessions and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Starting console on {}:{} against {}",
            bind_address.0,
            bind_address.1,
            server_config.backend_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(server_config.domain.clone()))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(show_index)
                .service(show_addresses)
                .service(new_address)
                .service(edit_address)
                .service(save_address)
                .service(delete_address)
                .service(show_customers)
                .service(new_customer)
                .service(edit_customer)
                .service(save_customer)
                .service(delete_customer)
                .service(show_products)
                .service(new_product)
                .service(edit_product)
                .service(save_product)
                .service(delete_product)
                .service(show_categories)
                .service(new_category)
                .service(edit_category)
                .service(save_category)
                .service(delete_category)
                .service(new_subcategory)
                .service(edit_subcategory)
                .service(save_subcategory)
                .service(delete_subcategory)
                .service(show_orders)
                .service(new_order)
                .service(create_order)
                .service(show_order)
                .service(delete_order)
                .service(show_statistics)
                .service(run_report)
                .service(export_departments)
                .app_data(web::Data::new(tera.clone()))
                .app_data(repo.clone())
                .app_data(report_cache.clone())
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
