use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::statistics::StatisticsQuery;
use crate::export::DEPARTMENT_CSV_FILENAME;
use crate::repository::RestRepository;
use crate::routes::{base_context, load_failure, redirect, render_template};
use crate::services::statistics::{self as statistics_service, ReportCache};
use crate::services::ServiceError;

#[get("/statistics")]
pub async fn show_statistics(
    query: web::Query<StatisticsQuery>,
    repo: web::Data<RestRepository>,
    cache: web::Data<ReportCache>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match statistics_service::load_dashboard(repo.into_inner(), &cache, &query).await {
        Ok(data) => {
            let mut context = base_context(&flash_messages, "statistics");
            context.insert("dashboard", &data);
            render_template(&tera, "statistics/index.html", &context)
        }
        Err(err) => load_failure(err, "statistics", "/statistics"),
    }
}

#[post("/statistics/run")]
pub async fn run_report(cache: web::Data<ReportCache>, body: web::Bytes) -> impl Responder {
    match statistics_service::run_report(&cache, &body) {
        Ok(range) => {
            let (from, to) = range.query_values();
            redirect(&format!("/statistics?from={from}&to={to}"))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/statistics")
        }
        Err(err) => {
            log::error!("Failed to run report: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/statistics/departments.csv")]
pub async fn export_departments(
    query: web::Query<StatisticsQuery>,
    repo: web::Data<RestRepository>,
    cache: web::Data<ReportCache>,
) -> impl Responder {
    match statistics_service::export_department_salaries(repo.into_inner(), &cache, &query).await
    {
        Ok(Some(csv)) => HttpResponse::Ok()
            .content_type("text/csv")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(
                    DEPARTMENT_CSV_FILENAME.to_string(),
                )],
            })
            .body(csv),
        Ok(None) => {
            FlashMessage::warning("There is no department data to export.").send();
            redirect("/statistics")
        }
        Err(err) => load_failure(err, "department salaries", "/statistics"),
    }
}
