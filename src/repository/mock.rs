//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::address::Address;
use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::product::{Product, ProductCategory, ProductSubCategory};
use crate::domain::statistics::{
    CategoryStatistics, DepartmentSalary, ReportRange, SubcategoryStatistics, YearComparison,
};
use crate::domain::types::{AddressId, CategoryId, CustomerId, OrderId, ProductId, SubCategoryId};
use crate::pagination::ResultPage;
use crate::query::ListRequest;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AddressReader, AddressWriter, CategoryReader, CategoryWriter, CustomerReader, CustomerWriter,
    OrderReader, OrderWriter, ProductReader, ProductWriter, StatisticsReader,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl AddressReader for Repository {
        async fn list_addresses(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Address>>;
        async fn get_address(&self, id: AddressId) -> RepositoryResult<Option<Address>>;
    }

    #[async_trait]
    impl AddressWriter for Repository {
        async fn save_address(&self, address: &Address) -> RepositoryResult<Address>;
        async fn delete_address(&self, id: AddressId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl CustomerReader for Repository {
        async fn list_customers(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Customer>>;
        async fn get_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;
    }

    #[async_trait]
    impl CustomerWriter for Repository {
        async fn save_customer(&self, customer: &Customer) -> RepositoryResult<Customer>;
        async fn delete_customer(&self, id: CustomerId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl CategoryReader for Repository {
        async fn list_categories(&self) -> RepositoryResult<Vec<ProductCategory>>;
        async fn get_category(&self, id: CategoryId) -> RepositoryResult<Option<ProductCategory>>;
        async fn list_subcategories(
            &self,
            category_id: Option<CategoryId>,
        ) -> RepositoryResult<Vec<ProductSubCategory>>;
        async fn get_subcategory(
            &self,
            id: SubCategoryId,
        ) -> RepositoryResult<Option<ProductSubCategory>>;
    }

    #[async_trait]
    impl CategoryWriter for Repository {
        async fn save_category(&self, category: &ProductCategory) -> RepositoryResult<ProductCategory>;
        async fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
        async fn save_subcategory(
            &self,
            subcategory: &ProductSubCategory,
        ) -> RepositoryResult<ProductSubCategory>;
        async fn delete_subcategory(&self, id: SubCategoryId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl ProductReader for Repository {
        async fn list_products(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Product>>;
        async fn get_product(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
    }

    #[async_trait]
    impl ProductWriter for Repository {
        async fn save_product(&self, product: &Product) -> RepositoryResult<Product>;
        async fn delete_product(&self, id: ProductId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl OrderReader for Repository {
        async fn list_orders(&self, request: &ListRequest) -> RepositoryResult<ResultPage<Order>>;
        async fn get_order(&self, id: OrderId) -> RepositoryResult<Option<Order>>;
    }

    #[async_trait]
    impl OrderWriter for Repository {
        async fn create_order(&self, order: &Order) -> RepositoryResult<Order>;
        async fn delete_order(&self, id: OrderId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl StatisticsReader for Repository {
        async fn category_sales(&self, range: ReportRange) -> RepositoryResult<Vec<CategoryStatistics>>;
        async fn subcategory_sales(
            &self,
            category_name: Option<String>,
            range: ReportRange,
        ) -> RepositoryResult<Vec<SubcategoryStatistics>>;
        async fn year_comparison(
            &self,
            year_a: i32,
            year_b: i32,
        ) -> RepositoryResult<Vec<YearComparison>>;
        async fn department_salaries(
            &self,
            range: ReportRange,
        ) -> RepositoryResult<Vec<DepartmentSalary>>;
    }
}
