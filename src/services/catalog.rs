//! Product categories and subcategories.

use crate::domain::product::{ProductCategory, ProductSubCategory};
use crate::domain::types::{CategoryId, SubCategoryId};
use crate::dto::catalog::{CatalogPageData, SubCategoryFormData};
use crate::forms::catalog::{CategoryForm, CategoryPayload, SubCategoryForm, SubCategoryPayload};
use crate::forms::parse_form;
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult, existing_id};

/// Lists all categories and the subcategories of `category_id`, or of the
/// first category when none is selected.
pub async fn load_catalog<R>(repo: &R, category_id: Option<i64>) -> ServiceResult<CatalogPageData>
where
    R: CategoryReader + ?Sized,
{
    let categories = repo.list_categories().await.map_err(|err| {
        log::error!("Failed to load product categories: {err}");
        err
    })?;

    let selected = match category_id {
        Some(raw) => {
            let id = existing_id(raw, CategoryId::new)?;
            Some(
                categories
                    .iter()
                    .find(|category| category.id == Some(id))
                    .cloned()
                    .ok_or(ServiceError::NotFound)?,
            )
        }
        None => categories.first().cloned(),
    };

    let subcategories = match selected.as_ref().and_then(|category| category.id) {
        Some(id) => repo.list_subcategories(Some(id)).await?,
        None => Vec::new(),
    };

    Ok(CatalogPageData {
        categories,
        selected,
        subcategories,
    })
}

pub async fn load_category<R>(repo: &R, category_id: Option<i64>) -> ServiceResult<ProductCategory>
where
    R: CategoryReader + ?Sized,
{
    let Some(category_id) = category_id else {
        return Ok(ProductCategory::default());
    };
    repo.get_category(existing_id(category_id, CategoryId::new)?)
        .await?
        .ok_or(ServiceError::NotFound)
}

pub async fn save_category<R>(repo: &R, body: &[u8]) -> ServiceResult<ProductCategory>
where
    R: CategoryWriter + ?Sized,
{
    let form: CategoryForm = parse_form(body)?;
    let category = CategoryPayload::try_from(form)?.into_domain();

    repo.save_category(&category).await.map_err(|err| {
        log::error!("Failed to save product category: {err}");
        ServiceError::from(err)
    })
}

pub async fn delete_category<R>(repo: &R, category_id: i64) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    let category_id = existing_id(category_id, CategoryId::new)?;
    repo.delete_category(category_id).await.map_err(|err| {
        log::error!("Failed to delete product category {category_id}: {err}");
        ServiceError::from(err)
    })
}

/// Subcategory to prefill the edit form with. A new subcategory starts in
/// `category_id` when given.
pub async fn load_subcategory<R>(
    repo: &R,
    subcategory_id: Option<i64>,
    category_id: Option<i64>,
) -> ServiceResult<SubCategoryFormData>
where
    R: CategoryReader + ?Sized,
{
    let subcategory = match subcategory_id {
        Some(raw) => Some(
            repo.get_subcategory(existing_id(raw, SubCategoryId::new)?)
                .await?
                .ok_or(ServiceError::NotFound)?,
        ),
        None => None,
    };
    let category_id = subcategory
        .as_ref()
        .map(|subcategory| subcategory.category_id)
        .or_else(|| category_id.and_then(|id| CategoryId::new(id).ok()));
    let categories = repo.list_categories().await?;

    Ok(SubCategoryFormData {
        subcategory,
        category_id,
        categories,
    })
}

pub async fn save_subcategory<R>(repo: &R, body: &[u8]) -> ServiceResult<ProductSubCategory>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let form: SubCategoryForm = parse_form(body)?;
    let subcategory = SubCategoryPayload::try_from(form)?.into_domain();

    if repo.get_category(subcategory.category_id).await?.is_none() {
        return Err(ServiceError::Form(format!(
            "Category {} does not exist",
            subcategory.category_id
        )));
    }

    repo.save_subcategory(&subcategory).await.map_err(|err| {
        log::error!("Failed to save product subcategory: {err}");
        ServiceError::from(err)
    })
}

/// Deletes the subcategory and returns the category it belonged to.
pub async fn delete_subcategory<R>(repo: &R, subcategory_id: i64) -> ServiceResult<Option<CategoryId>>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let subcategory_id = existing_id(subcategory_id, SubCategoryId::new)?;
    let category_id = repo
        .get_subcategory(subcategory_id)
        .await?
        .map(|subcategory| subcategory.category_id);

    repo.delete_subcategory(subcategory_id).await.map_err(|err| {
        log::error!("Failed to delete product subcategory {subcategory_id}: {err}");
        ServiceError::from(err)
    })?;

    Ok(category_id)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::repository::mock::MockRepository;

    fn category(id: i64, name: &str) -> ProductCategory {
        ProductCategory {
            id: Some(CategoryId::new(id).unwrap()),
            name: name.to_string(),
        }
    }

    #[test]
    fn first_category_is_selected_by_default() {
        let mut repo = MockRepository::new();
        repo.expect_list_categories()
            .times(1)
            .returning(|| Ok(vec![category(1, "Bikes"), category(2, "Clothing")]));
        repo.expect_list_subcategories()
            .withf(|category_id| category_id.map(CategoryId::get) == Some(1))
            .times(1)
            .returning(|_| {
                Ok(vec![ProductSubCategory {
                    id: SubCategoryId::new(10).ok(),
                    category_id: CategoryId::new(1).unwrap(),
                    name: "Road Bikes".to_string(),
                    modified_date: None,
                }])
            });

        let data = block_on(load_catalog(&repo, None)).unwrap();

        assert_eq!(data.selected.map(|c| c.name), Some("Bikes".to_string()));
        assert_eq!(data.subcategories.len(), 1);
    }

    #[test]
    fn unknown_category_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_list_categories()
            .returning(|| Ok(vec![category(1, "Bikes")]));
        repo.expect_list_subcategories().times(0);

        let result = block_on(load_catalog(&repo, Some(7)));

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn subcategory_of_a_missing_category_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_category().times(1).returning(|_| Ok(None));
        repo.expect_save_subcategory().times(0);

        let result = block_on(save_subcategory(&repo, b"category_id=3&name=Gloves"));

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn deleting_a_subcategory_returns_its_category() {
        let mut repo = MockRepository::new();
        repo.expect_get_subcategory().times(1).returning(|id| {
            Ok(Some(ProductSubCategory {
                id: Some(id),
                category_id: CategoryId::new(4).unwrap(),
                name: "Gloves".to_string(),
                modified_date: None,
            }))
        });
        repo.expect_delete_subcategory()
            .times(1)
            .returning(|_| Ok(()));

        let category_id = block_on(delete_subcategory(&repo, 12)).unwrap();

        assert_eq!(category_id.map(CategoryId::get), Some(4));
    }
}
