use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::dto::catalog::{ProductFormData, ProductsPageData};
use crate::dto::listing::ListQuery;
use crate::forms::catalog::{ProductForm, ProductPayload};
use crate::forms::parse_form;
use crate::query::PRODUCT_SEARCH;
use crate::repository::{CategoryReader, ProductReader, ProductWriter};
use crate::services::listing::load_list;
use crate::services::{ServiceError, ServiceResult, existing_id};

/// Loads one page of the products table, optionally narrowed to a
/// subcategory through the `subCategoryId` filter.
pub async fn list_products<R>(
    repo: &R,
    query: &ListQuery,
    default_size: usize,
) -> ProductsPageData
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let products = load_list(PRODUCT_SEARCH, query, default_size, |request| async move {
        repo.list_products(&request).await
    })
    .await;

    let subcategories = repo.list_subcategories(None).await.unwrap_or_else(|err| {
        log::warn!("Failed to load product subcategories: {err}");
        Vec::new()
    });

    ProductsPageData {
        products,
        subcategories,
    }
}

pub async fn load_product<R>(repo: &R, product_id: Option<i64>) -> ServiceResult<ProductFormData>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let product = match product_id {
        Some(raw) => repo
            .get_product(existing_id(raw, ProductId::new)?)
            .await?
            .ok_or(ServiceError::NotFound)?,
        None => Product {
            active: true,
            ..Product::default()
        },
    };
    let subcategories = repo.list_subcategories(None).await?;

    Ok(ProductFormData {
        product,
        subcategories,
    })
}

/// Validates the submitted form and creates or updates the product.
pub async fn save_product<R>(repo: &R, body: &[u8]) -> ServiceResult<Product>
where
    R: ProductWriter + CategoryReader + ?Sized,
{
    let form: ProductForm = parse_form(body)?;
    let product = ProductPayload::try_from(form)?.into_domain();

    if let Some(subcategory_id) = product.sub_category_id
        && repo.get_subcategory(subcategory_id).await?.is_none()
    {
        return Err(ServiceError::Form(format!(
            "Subcategory {subcategory_id} does not exist"
        )));
    }

    repo.save_product(&product).await.map_err(|err| {
        log::error!("Failed to save product {}: {err}", product.sku);
        ServiceError::from(err)
    })
}

pub async fn delete_product<R>(repo: &R, product_id: i64) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    let product_id = existing_id(product_id, ProductId::new)?;
    repo.delete_product(product_id).await.map_err(|err| {
        log::error!("Failed to delete product {product_id}: {err}");
        ServiceError::from(err)
    })
}
