use crate::domain::address::Address;
use crate::domain::types::AddressId;
use crate::dto::listing::{ListPage, ListQuery};
use crate::forms::addresses::{AddressForm, AddressPayload};
use crate::forms::parse_form;
use crate::query::ADDRESS_SEARCH;
use crate::repository::{AddressReader, AddressWriter};
use crate::services::listing::load_list;
use crate::services::{ServiceError, ServiceResult, existing_id};

/// Loads one page of the address table.
pub async fn list_addresses<R>(
    repo: &R,
    query: &ListQuery,
    default_size: usize,
) -> ListPage<Address>
where
    R: AddressReader + ?Sized,
{
    load_list(ADDRESS_SEARCH, query, default_size, |request| async move {
        repo.list_addresses(&request).await
    })
    .await
}

/// Address to prefill the edit form with; a blank one for `None`.
pub async fn load_address<R>(repo: &R, address_id: Option<i64>) -> ServiceResult<Address>
where
    R: AddressReader + ?Sized,
{
    let Some(address_id) = address_id else {
        return Ok(Address::default());
    };
    let address_id = existing_id(address_id, AddressId::new)?;
    repo.get_address(address_id)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Validates the submitted form and creates or updates the address.
pub async fn save_address<R>(repo: &R, body: &[u8]) -> ServiceResult<Address>
where
    R: AddressWriter + ?Sized,
{
    let form: AddressForm = parse_form(body)?;
    let address = AddressPayload::try_from(form)?.into_domain();

    repo.save_address(&address).await.map_err(|err| {
        log::error!("Failed to save address: {err}");
        ServiceError::from(err)
    })
}

pub async fn delete_address<R>(repo: &R, address_id: i64) -> ServiceResult<()>
where
    R: AddressWriter + ?Sized,
{
    let address_id = existing_id(address_id, AddressId::new)?;
    repo.delete_address(address_id).await.map_err(|err| {
        log::error!("Failed to delete address {address_id}: {err}");
        ServiceError::from(err)
    })
}
