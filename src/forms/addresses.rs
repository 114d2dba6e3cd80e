use serde::Deserialize;
use validator::Validate;

use crate::domain::address::Address;
use crate::domain::types::{AddressId, City, PostalCode, Street};
use crate::forms::{FormError, optional_text, required};

#[derive(Debug, Deserialize, Validate)]
/// Create/update form of an address. A missing `id` creates a new one.
pub struct AddressForm {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: String,
}

pub struct AddressPayload {
    pub id: Option<AddressId>,
    pub street: Street,
    pub city: City,
    pub state: Option<String>,
    pub postal_code: PostalCode,
}

impl TryFrom<AddressForm> for AddressPayload {
    type Error = FormError;

    fn try_from(form: AddressForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            id: form.id.map(AddressId::new).transpose()?,
            street: Street::new(form.street).map_err(required("street"))?,
            city: City::new(form.city).map_err(required("city"))?,
            state: optional_text(form.state),
            postal_code: PostalCode::new(form.postal_code).map_err(required("postal code"))?,
        })
    }
}

impl AddressPayload {
    pub fn into_domain(self) -> Address {
        Address {
            id: self.id,
            street: self.street.into_inner(),
            city: self.city.into_inner(),
            state: self.state,
            postal_code: self.postal_code.into_inner(),
        }
    }
}
