//! Forms for products and their categories.

use serde::Deserialize;
use validator::Validate;

use crate::domain::product::{Product, ProductCategory, ProductSubCategory};
use crate::domain::types::{CategoryId, EntityName, Price, ProductId, Sku, SubCategoryId};
use crate::forms::{FormError, optional_text, required};

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryForm {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

pub struct CategoryPayload {
    pub id: Option<CategoryId>,
    pub name: EntityName,
}

impl TryFrom<CategoryForm> for CategoryPayload {
    type Error = FormError;

    fn try_from(form: CategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            id: form.id.map(CategoryId::new).transpose()?,
            name: EntityName::new(form.name).map_err(required("name"))?,
        })
    }
}

impl CategoryPayload {
    pub fn into_domain(self) -> ProductCategory {
        ProductCategory {
            id: self.id,
            name: self.name.into_inner(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubCategoryForm {
    pub id: Option<i64>,
    pub category_id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

pub struct SubCategoryPayload {
    pub id: Option<SubCategoryId>,
    pub category_id: CategoryId,
    pub name: EntityName,
}

impl TryFrom<SubCategoryForm> for SubCategoryPayload {
    type Error = FormError;

    fn try_from(form: SubCategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let category_id = form.category_id.ok_or(FormError::EmptyField("category"))?;
        Ok(Self {
            id: form.id.map(SubCategoryId::new).transpose()?,
            category_id: CategoryId::new(category_id).map_err(|_| FormError::InvalidId)?,
            name: EntityName::new(form.name).map_err(required("name"))?,
        })
    }
}

impl SubCategoryPayload {
    pub fn into_domain(self) -> ProductSubCategory {
        ProductSubCategory {
            id: self.id,
            category_id: self.category_id,
            name: self.name.into_inner(),
            modified_date: None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductForm {
    pub id: Option<i64>,
    pub sub_category_id: Option<i64>,
    #[validate(length(min = 1, max = 64))]
    pub sku: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub price: String,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i64>,
    /// Checkbox: present when ticked.
    pub active: Option<String>,
}

pub struct ProductPayload {
    pub id: Option<ProductId>,
    pub sub_category_id: Option<SubCategoryId>,
    pub sku: Sku,
    pub name: EntityName,
    pub description: Option<String>,
    pub price: Price,
    pub stock_quantity: u32,
    pub active: bool,
}

impl TryFrom<ProductForm> for ProductPayload {
    type Error = FormError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let stock_quantity = u32::try_from(form.stock_quantity.unwrap_or(0))
            .map_err(|_| FormError::InvalidQuantity)?;
        let description = optional_text(form.description)
            .map(|text| ammonia::clean(&text))
            .and_then(|text| optional_text(Some(text)));

        Ok(Self {
            id: form.id.map(ProductId::new).transpose()?,
            sub_category_id: form
                .sub_category_id
                .map(SubCategoryId::new)
                .transpose()
                .map_err(|_| FormError::InvalidId)?,
            sku: Sku::new(form.sku).map_err(required("sku"))?,
            name: EntityName::new(form.name).map_err(required("name"))?,
            description,
            price: Price::parse(&form.price).map_err(|_| FormError::InvalidPrice)?,
            stock_quantity,
            active: form.active.is_some(),
        })
    }
}

impl ProductPayload {
    pub fn into_domain(self) -> Product {
        Product {
            id: self.id,
            sub_category_id: self.sub_category_id,
            sku: self.sku.into_inner(),
            name: self.name.into_inner(),
            description: self.description,
            price: self.price.get(),
            stock_quantity: self.stock_quantity,
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::parse_form;

    #[test]
    fn product_form_is_sanitized_and_typed() {
        let form: ProductForm = parse_form(
            b"id=&sub_category_id=4&sku=BK-1&name=Road+Bike&price=499.90\
              &stock_quantity=3&description=%3Cscript%3Ex%3C%2Fscript%3EFast&active=on",
        )
        .unwrap();

        let product = ProductPayload::try_from(form).unwrap().into_domain();

        assert_eq!(product.description.as_deref(), Some("Fast"));
        assert_eq!(product.price, 499.9);
        assert_eq!(product.stock_quantity, 3);
        assert!(product.active);
        assert_eq!(product.sub_category_id.map(SubCategoryId::get), Some(4));
    }

    #[test]
    fn negative_or_imprecise_price_is_rejected() {
        for price in ["-1", "0", "1.999", "free"] {
            let form = ProductForm {
                id: None,
                sub_category_id: None,
                sku: "SKU".to_string(),
                name: "Thing".to_string(),
                description: None,
                price: price.to_string(),
                stock_quantity: None,
                active: None,
            };
            assert!(matches!(
                ProductPayload::try_from(form),
                Err(FormError::InvalidPrice)
            ));
        }
    }

    #[test]
    fn subcategory_requires_a_category() {
        let form = SubCategoryForm {
            id: None,
            category_id: None,
            name: "Gloves".to_string(),
        };

        assert!(matches!(
            SubCategoryPayload::try_from(form),
            Err(FormError::EmptyField("category"))
        ));
    }
}
