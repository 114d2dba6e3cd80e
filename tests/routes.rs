use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::Level;
use retail_console::routes::alert_level_to_str;
use retail_console::routes::main::show_index;
use retail_console::routes::statistics::run_report;
use retail_console::services::statistics::ReportCache;

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[actix_web::test]
async fn test_index_redirects_to_addresses() {
    let app = test::init_service(App::new().service(show_index)).await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/addresses"
    );
}

#[actix_web::test]
async fn test_run_report_redirects_to_the_requested_range() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(ReportCache::new()))
            .service(run_report),
    )
    .await;

    let request = test::TestRequest::post()
        .uri("/statistics/run")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("from=2025-05-01&to=2025-05-31")
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/statistics?from=2025-05-01&to=2025-05-31"
    );
}
