//! DTOs used by the product catalog pages.

use serde::Serialize;

use crate::domain::product::{Product, ProductCategory, ProductSubCategory};
use crate::domain::types::CategoryId;
use crate::dto::listing::ListPage;

/// Categories with the subcategories of the selected one.
#[derive(Debug, Serialize)]
pub struct CatalogPageData {
    pub categories: Vec<ProductCategory>,
    pub selected: Option<ProductCategory>,
    pub subcategories: Vec<ProductSubCategory>,
}

/// Data required to render the products table.
#[derive(Debug, Serialize)]
pub struct ProductsPageData {
    pub products: ListPage<Product>,
    /// Options of the subcategory filter.
    pub subcategories: Vec<ProductSubCategory>,
}

/// Data required to render the product edit form.
#[derive(Debug, Serialize)]
pub struct ProductFormData {
    pub product: Product,
    pub subcategories: Vec<ProductSubCategory>,
}

/// Data required to render the subcategory edit form.
#[derive(Debug, Serialize)]
pub struct SubCategoryFormData {
    /// `None` when creating a new subcategory.
    pub subcategory: Option<ProductSubCategory>,
    /// Category preselected in the form.
    pub category_id: Option<CategoryId>,
    pub categories: Vec<ProductCategory>,
}
