//! HTTP implementation of the repository traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::Entity;
use crate::domain::address::Address;
use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::product::{Product, ProductCategory, ProductSubCategory};
use crate::domain::statistics::{
    CategoryStatistics, DepartmentSalary, ReportRange, SubcategoryStatistics, YearComparison,
};
use crate::domain::types::{AddressId, CategoryId, CustomerId, OrderId, ProductId, SubCategoryId};
use crate::pagination::{ResultPage, WirePage};
use crate::query::ListRequest;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AddressReader, AddressWriter, CategoryReader, CategoryWriter, CustomerReader, CustomerWriter,
    OrderReader, OrderWriter, ProductReader, ProductWriter, StatisticsReader,
};

const API_PREFIX: &str = "api/v1";

/// Longest backend error body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Clone)]
pub struct RestRepository {
    client: Client,
    base_url: String,
}

impl RestRepository {
    pub fn new(backend_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::ConnectionError(format!("HTTP client: {e}")))?;
        Ok(Self::with_client(client, backend_url))
    }

    pub fn with_client(client: Client, backend_url: &str) -> Self {
        Self {
            client,
            base_url: backend_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_PREFIX}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: Response) -> RepositoryResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let cut = (0..=MAX_ERROR_BODY)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(RepositoryError::from_status(status.as_u16(), body))
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> RepositoryResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized + Sync,
    {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn fetch_page<T>(&self, request: &ListRequest) -> RepositoryResult<ResultPage<T>>
    where
        T: DeserializeOwned,
    {
        let wire: WirePage<T> = self.get_json(&request.path, &request.params()).await?;
        Ok(wire.into_page(request.page, request.size))
    }

    /// `GET /{resource}/{id}`, mapping 404 to `None`.
    async fn fetch_optional<T>(&self, resource: &str, id: i64) -> RepositoryResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .client
            .get(self.url(&format!("{resource}/{id}")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        Ok(Some(response.json::<T>().await?))
    }

    /// `PUT /{resource}/{id}` when the entity has an id, `POST /{resource}`
    /// otherwise.
    async fn upsert<T>(&self, resource: &str, entity: &T) -> RepositoryResult<T>
    where
        T: Entity + Serialize + DeserializeOwned + Sync,
    {
        let request = match entity.entity_id() {
            Some(id) => self.client.put(self.url(&format!("{resource}/{id}"))),
            None => self.client.post(self.url(resource)),
        };
        let response = Self::check(request.json(entity).send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn create<T>(&self, resource: &str, entity: &T) -> RepositoryResult<T>
    where
        T: Serialize + DeserializeOwned + Sync,
    {
        let response = self.client.post(self.url(resource)).json(entity).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn delete(&self, resource: &str, id: i64) -> RepositoryResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("{resource}/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    fn range_query(range: &ReportRange) -> Vec<(&'static str, String)> {
        let (from, to) = range.query_values();
        vec![("from", from), ("to", to)]
    }
}

#[async_trait]
impl AddressReader for RestRepository {
    async fn list_addresses(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Address>> {
        self.fetch_page(request).await
    }

    async fn get_address(&self, id: AddressId) -> RepositoryResult<Option<Address>> {
        self.fetch_optional("addresses", id.get()).await
    }
}

#[async_trait]
impl AddressWriter for RestRepository {
    async fn save_address(&self, address: &Address) -> RepositoryResult<Address> {
        self.upsert("addresses", address).await
    }

    async fn delete_address(&self, id: AddressId) -> RepositoryResult<()> {
        self.delete("addresses", id.get()).await
    }
}

#[async_trait]
impl CustomerReader for RestRepository {
    async fn list_customers(
        &self,
        request: &ListRequest,
    ) -> RepositoryResult<ResultPage<Customer>> {
        self.fetch_page(request).await
    }

    async fn get_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        self.fetch_optional("customers", id.get()).await
    }
}

#[async_trait]
impl CustomerWriter for RestRepository {
    async fn save_customer(&self, customer: &Customer) -> RepositoryResult<Customer> {
        self.upsert("customers", customer).await
    }

    async fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()> {
        self.delete("customers", id.get()).await
    }
}

#[async_trait]
impl CategoryReader for RestRepository {
    async fn list_categories(&self) -> RepositoryResult<Vec<ProductCategory>> {
        self.get_json("product-categories", &[] as &[(&str, &str)])
            .await
    }

    async fn get_category(&self, id: CategoryId) -> RepositoryResult<Option<ProductCategory>> {
        self.fetch_optional("product-categories", id.get()).await
    }

    async fn list_subcategories(
        &self,
        category_id: Option<CategoryId>,
    ) -> RepositoryResult<Vec<ProductSubCategory>> {
        let query: Vec<(&str, i64)> = category_id
            .map(|id| ("categoryId", id.get()))
            .into_iter()
            .collect();
        self.get_json("product-subcategories", &query).await
    }

    async fn get_subcategory(
        &self,
        id: SubCategoryId,
    ) -> RepositoryResult<Option<ProductSubCategory>> {
        self.fetch_optional("product-subcategories", id.get()).await
    }
}

#[async_trait]
impl CategoryWriter for RestRepository {
    async fn save_category(&self, category: &ProductCategory) -> RepositoryResult<ProductCategory> {
        self.upsert("product-categories", category).await
    }

    async fn delete_category(&self, id: CategoryId) -> RepositoryResult<()> {
        self.delete("product-categories", id.get()).await
    }

    async fn save_subcategory(
        &self,
        subcategory: &ProductSubCategory,
    ) -> RepositoryResult<ProductSubCategory> {
        self.upsert("product-subcategories", subcategory).await
    }

    async fn delete_subcategory(&self, id: SubCategoryId) -> RepositoryResult<()> {
        self.delete("product-subcategories", id.get()).await
    }
}

#[async_trait]
impl ProductReader for RestRepository {
    async fn list_products(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Product>> {
        self.fetch_page(request).await
    }

    async fn get_product(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        self.fetch_optional("products", id.get()).await
    }
}

#[async_trait]
impl ProductWriter for RestRepository {
    async fn save_product(&self, product: &Product) -> RepositoryResult<Product> {
        self.upsert("products", product).await
    }

    async fn delete_product(&self, id: ProductId) -> RepositoryResult<()> {
        self.delete("products", id.get()).await
    }
}

#[async_trait]
impl OrderReader for RestRepository {
    async fn list_orders(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Order>> {
        self.fetch_page(request).await
    }

    async fn get_order(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        self.fetch_optional("orders", id.get()).await
    }
}

#[async_trait]
impl OrderWriter for RestRepository {
    async fn create_order(&self, order: &Order) -> RepositoryResult<Order> {
        self.create("orders", order).await
    }

    async fn delete_order(&self, id: OrderId) -> RepositoryResult<()> {
        self.delete("orders", id.get()).await
    }
}

#[async_trait]
impl StatisticsReader for RestRepository {
    async fn category_sales(&self, range: ReportRange) -> RepositoryResult<Vec<CategoryStatistics>> {
        self.get_json("statistics/category-sales", &Self::range_query(&range))
            .await
    }

    async fn subcategory_sales(
        &self,
        category_name: Option<String>,
        range: ReportRange,
    ) -> RepositoryResult<Vec<SubcategoryStatistics>> {
        let mut query = Self::range_query(&range);
        if let Some(name) = category_name {
            query.push(("categoryName", name));
        }
        self.get_json("statistics/subcategory-sales", &query).await
    }

    async fn year_comparison(
        &self,
        year_a: i32,
        year_b: i32,
    ) -> RepositoryResult<Vec<YearComparison>> {
        self.get_json(
            "statistics/year-comparison",
            &[("yearA", year_a), ("yearB", year_b)],
        )
        .await
    }

    async fn department_salaries(
        &self,
        range: ReportRange,
    ) -> RepositoryResult<Vec<DepartmentSalary>> {
        self.get_json("statistics/department-salaries", &Self::range_query(&range))
            .await
    }
}
