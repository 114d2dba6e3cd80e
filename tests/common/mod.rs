//! Throwaway REST backend for the integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::dev::{Service, ServerHandle};
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

/// Backend bound to an ephemeral local port that records every request it
/// receives as `METHOD path?query`.
pub struct FakeBackend {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: ServerHandle,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let server = HttpServer::new(move || {
            let recorded = recorded.clone();
            App::new()
                .wrap_fn(move |req, srv| {
                    let line = match req.query_string() {
                        "" => format!("{} {}", req.method(), req.path()),
                        query => format!("{} {}?{}", req.method(), req.path(), query),
                    };
                    recorded.lock().unwrap().push(line);
                    srv.call(req)
                })
                .service(
                    web::scope("/api/v1")
                        .route("/addresses/search", web::get().to(search_addresses))
                        .route("/addresses/{id}", web::get().to(get_address))
                        .route("/addresses", web::post().to(create_address))
                        .route("/addresses/{id}", web::put().to(reject_address))
                        .route("/customers/{id}", web::delete().to(fail))
                        .route("/product-subcategories", web::get().to(subcategories))
                        .route(
                            "/statistics/department-salaries",
                            web::get().to(department_salaries),
                        )
                        .route("/statistics/year-comparison", web::get().to(malformed)),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let address = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            url: format!("http://{address}"),
            requests,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

fn address(id: i64) -> Value {
    json!({
        "id": id,
        "street": "1 Main St",
        "city": "Paris",
        "state": null,
        "postalCode": "75001"
    })
}

async fn search_addresses(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: usize = query.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
    HttpResponse::Ok().json(json!({
        "content": [address(1), address(2)],
        "totalElements": 12,
        "number": page,
        "size": size
    }))
}

async fn get_address(id: web::Path<i64>) -> HttpResponse {
    match id.into_inner() {
        1 => HttpResponse::Ok().json(address(1)),
        _ => HttpResponse::NotFound().body("no such address"),
    }
}

async fn create_address(body: web::Json<Value>) -> HttpResponse {
    let mut created = body.into_inner();
    created["id"] = json!(42);
    HttpResponse::Created().json(created)
}

async fn reject_address() -> HttpResponse {
    HttpResponse::BadRequest().body("street must not be blank")
}

async fn fail() -> HttpResponse {
    HttpResponse::InternalServerError().body("boom")
}

async fn subcategories(query: web::Query<HashMap<String, String>>) -> HttpResponse {
    let category_id: i64 = query
        .get("categoryId")
        .and_then(|id| id.parse().ok())
        .unwrap_or(1);
    HttpResponse::Ok().json(json!([
        {"id": 5, "categoryId": category_id, "name": "Road", "modifiedDate": "2025-06-01T10:00:00"}
    ]))
}

async fn department_salaries() -> HttpResponse {
    HttpResponse::Ok().json(json!([
        {
            "departmentName": "Sales",
            "employeeCount": 3,
            "totalSalary": 90000.0,
            "averageSalary": 30000.0,
            "minSalary": 25000.0,
            "maxSalary": 35000.0
        }
    ]))
}

async fn malformed() -> HttpResponse {
    HttpResponse::Ok().content_type("application/json").body("{\"oops\":")
}
