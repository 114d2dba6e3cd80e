use serde::{Deserialize, Serialize};

use crate::domain::Entity;
use crate::domain::types::{CategoryId, ProductId, SubCategoryId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProductCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SubCategoryId>,
    pub category_id: CategoryId,
    pub name: String,
    /// Last modification timestamp as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub sub_category_id: Option<SubCategoryId>,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub active: bool,
}

impl Entity for ProductCategory {
    fn entity_id(&self) -> Option<i64> {
        self.id.map(CategoryId::get)
    }
}

impl Entity for ProductSubCategory {
    fn entity_id(&self) -> Option<i64> {
        self.id.map(SubCategoryId::get)
    }
}

impl Entity for Product {
    fn entity_id(&self) -> Option<i64> {
        self.id.map(ProductId::get)
    }
}
