use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;

use crate::domain::customer::Customer;
use crate::domain::types::{AddressId, CustomerId};
use crate::dto::customers::{CustomerFormData, CustomersPageData};
use crate::dto::listing::ListQuery;
use crate::forms::customers::{CustomerForm, CustomerPayload};
use crate::forms::parse_form;
use crate::query::CUSTOMER_SEARCH;
use crate::repository::{AddressReader, CustomerReader, CustomerWriter};
use crate::services::listing::load_list;
use crate::services::{ServiceError, ServiceResult, existing_id};

/// Loads one page of the customers table together with the labels of the
/// addresses it references. A failed address lookup only drops its label.
pub async fn list_customers<R>(
    repo: &R,
    query: &ListQuery,
    default_size: usize,
) -> CustomersPageData
where
    R: CustomerReader + AddressReader + ?Sized,
{
    let customers = load_list(CUSTOMER_SEARCH, query, default_size, |request| async move {
        repo.list_customers(&request).await
    })
    .await;

    let address_ids: BTreeSet<AddressId> = customers
        .list
        .items
        .iter()
        .filter_map(|customer| customer.address_id)
        .collect();

    let lookups = join_all(address_ids.into_iter().map(|id| async move {
        (id, repo.get_address(id).await)
    }))
    .await;

    let address_labels = lookups
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(Some(address)) => Some((id.to_string(), address.label())),
            Ok(None) => None,
            Err(err) => {
                log::warn!("Failed to load address {id}: {err}");
                None
            }
        })
        .collect::<HashMap<_, _>>();

    CustomersPageData {
        customers,
        address_labels,
    }
}

/// Customer to prefill the edit form with; a blank one for `None`.
pub async fn load_customer<R>(repo: &R, customer_id: Option<i64>) -> ServiceResult<CustomerFormData>
where
    R: CustomerReader + AddressReader + ?Sized,
{
    let Some(customer_id) = customer_id else {
        return Ok(CustomerFormData {
            customer: Customer::default(),
            address: None,
        });
    };
    let customer_id = existing_id(customer_id, CustomerId::new)?;
    let customer = repo
        .get_customer(customer_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let address = match customer.address_id {
        Some(address_id) => repo.get_address(address_id).await?,
        None => None,
    };

    Ok(CustomerFormData { customer, address })
}

/// Validates the submitted form and creates or updates the customer.
pub async fn save_customer<R>(repo: &R, body: &[u8]) -> ServiceResult<Customer>
where
    R: CustomerWriter + AddressReader + ?Sized,
{
    let form: CustomerForm = parse_form(body)?;
    let customer = CustomerPayload::try_from(form)?.into_domain();

    if let Some(address_id) = customer.address_id
        && repo.get_address(address_id).await?.is_none()
    {
        return Err(ServiceError::Form(format!(
            "Address {address_id} does not exist"
        )));
    }

    repo.save_customer(&customer).await.map_err(|err| {
        log::error!("Failed to save customer: {err}");
        ServiceError::from(err)
    })
}

pub async fn delete_customer<R>(repo: &R, customer_id: i64) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    let customer_id = existing_id(customer_id, CustomerId::new)?;
    repo.delete_customer(customer_id).await.map_err(|err| {
        log::error!("Failed to delete customer {customer_id}: {err}");
        ServiceError::from(err)
    })
}
