use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::Customer;
use crate::domain::types::{AddressId, CustomerId, Email, PersonName};
use crate::forms::{FormError, required};

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerForm {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub address_id: Option<i64>,
}

pub struct CustomerPayload {
    pub id: Option<CustomerId>,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: Email,
    pub address_id: Option<AddressId>,
}

impl TryFrom<CustomerForm> for CustomerPayload {
    type Error = FormError;

    fn try_from(form: CustomerForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            id: form.id.map(CustomerId::new).transpose()?,
            first_name: PersonName::new(form.first_name).map_err(required("first name"))?,
            last_name: PersonName::new(form.last_name).map_err(required("last name"))?,
            email: Email::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            address_id: form
                .address_id
                .map(AddressId::new)
                .transpose()
                .map_err(|_| FormError::InvalidId)?,
        })
    }
}

impl CustomerPayload {
    pub fn into_domain(self) -> Customer {
        Customer {
            id: self.id,
            first_name: self.first_name.into_inner(),
            last_name: self.last_name.into_inner(),
            email: self.email.into_inner(),
            address_id: self.address_id,
        }
    }
}
