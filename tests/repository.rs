mod common;

use std::sync::Arc;
use std::time::Duration;

use retail_console::domain::address::Address;
use retail_console::domain::types::{AddressId, CategoryId, CustomerId};
use retail_console::dto::listing::ListQuery;
use retail_console::dto::statistics::StatisticsQuery;
use retail_console::query::{ADDRESS_SEARCH, QueryStateManager, SearchCriteria};
use retail_console::repository::errors::RepositoryError;
use retail_console::repository::{
    AddressReader, AddressWriter, CategoryReader, CustomerWriter, RestRepository,
    StatisticsReader,
};
use retail_console::services::addresses::list_addresses;
use retail_console::services::statistics::{ReportCache, export_department_salaries};

use common::FakeBackend;

fn repository(backend: &FakeBackend) -> RestRepository {
    RestRepository::new(&backend.url, Duration::from_secs(5)).unwrap()
}

#[actix_web::test]
async fn test_search_request_carries_criteria_paging_and_sort() {
    let backend = FakeBackend::start().await;
    let repo = repository(&backend);

    let mut manager = QueryStateManager::new(ADDRESS_SEARCH, 5);
    manager.apply_search(SearchCriteria::new("Main").search_type("city"));
    manager.set_sort(Some("street,desc".parse().unwrap()));
    manager.set_page(1, 5).unwrap();

    let page = repo.list_addresses(&manager.request()).await.unwrap();

    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.number, 1);
    assert_eq!(
        backend.requests(),
        vec!["GET /api/v1/addresses/search?page=1&size=5&sort=street%2Cdesc&city=Main".to_string()]
    );

    backend.stop().await;
}

#[actix_web::test]
async fn test_address_lookup_create_and_rejection() {
    let backend = FakeBackend::start().await;
    let repo = repository(&backend);

    let found = repo.get_address(AddressId::new(1).unwrap()).await.unwrap();
    assert_eq!(found.map(|a| a.city), Some("Paris".to_string()));

    let missing = repo.get_address(AddressId::new(7).unwrap()).await.unwrap();
    assert!(missing.is_none());

    let mut address = Address {
        id: None,
        street: "2 Side St".to_string(),
        city: "Lyon".to_string(),
        state: None,
        postal_code: "69001".to_string(),
    };
    let created = repo.save_address(&address).await.unwrap();
    assert_eq!(created.id.map(AddressId::get), Some(42));
    assert_eq!(created.street, "2 Side St");

    address.id = AddressId::new(3).ok();
    let rejected = repo.save_address(&address).await;
    assert_eq!(
        rejected,
        Err(RepositoryError::Rejected {
            status: 400,
            message: "street must not be blank".to_string()
        })
    );

    assert!(backend.requests().contains(&"PUT /api/v1/addresses/3".to_string()));

    backend.stop().await;
}

#[actix_web::test]
async fn test_backend_failures_map_to_repository_errors() {
    let backend = FakeBackend::start().await;
    let repo = repository(&backend);

    let deleted = repo.delete_customer(CustomerId::new(9).unwrap()).await;
    assert!(matches!(
        deleted,
        Err(RepositoryError::Backend { status: 500, .. })
    ));

    let years = repo.year_comparison(2024, 2025).await;
    assert!(matches!(years, Err(RepositoryError::Decode(_))));

    backend.stop().await;
}

#[actix_web::test]
async fn test_unreachable_backend_is_a_connection_error() {
    let backend = FakeBackend::start().await;
    let url = backend.url.clone();
    backend.stop().await;

    let repo = RestRepository::new(&url, Duration::from_secs(5)).unwrap();
    let result = repo.list_categories().await;

    assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));
}

#[actix_web::test]
async fn test_subcategories_are_filtered_by_category() {
    let backend = FakeBackend::start().await;
    let repo = repository(&backend);

    let subcategories = repo
        .list_subcategories(CategoryId::new(3).ok())
        .await
        .unwrap();

    assert_eq!(subcategories.len(), 1);
    assert_eq!(subcategories[0].category_id.get(), 3);
    assert_eq!(
        backend.requests(),
        vec!["GET /api/v1/product-subcategories?categoryId=3".to_string()]
    );

    backend.stop().await;
}

#[actix_web::test]
async fn test_list_page_clamps_a_stale_page_against_the_real_backend() {
    let backend = FakeBackend::start().await;
    let repo = repository(&backend);

    // 12 addresses at 5 per page: page 7 no longer exists.
    let query: ListQuery =
        serde_html_form::from_str("q=Main&type=general&page=7&size=5&total=12").unwrap();
    let page = list_addresses(&repo, &query, 10).await;

    assert_eq!(page.list.info.page, 2);
    assert_eq!(page.list.page, 3);
    assert!(page.load_error.is_none());
    assert_eq!(
        backend.requests(),
        vec!["GET /api/v1/addresses/search?page=2&size=5&q=Main".to_string()]
    );

    backend.stop().await;
}

#[actix_web::test]
async fn test_department_export_is_served_from_the_report_cache() {
    let backend = FakeBackend::start().await;
    let repo = Arc::new(repository(&backend));
    let cache = ReportCache::new();
    let query = StatisticsQuery::default();

    let first = export_department_salaries(repo.clone(), &cache, &query)
        .await
        .unwrap()
        .unwrap();
    let second = export_department_salaries(repo.clone(), &cache, &query)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    let csv = String::from_utf8(first).unwrap();
    assert!(csv.starts_with("Department,Employee Count,Average Salary"));
    assert!(csv.contains("\"Sales\",3,"));
    assert_eq!(
        backend.requests(),
        vec![
            "GET /api/v1/statistics/department-salaries?from=2025-06-01&to=2025-06-30"
                .to_string()
        ]
    );

    backend.stop().await;
}
