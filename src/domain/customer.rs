use serde::{Deserialize, Serialize};

use crate::domain::Entity;
use crate::domain::types::{AddressId, CustomerId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Optional link to the customer's postal address.
    #[serde(default)]
    pub address_id: Option<AddressId>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Customer {
    fn entity_id(&self) -> Option<i64> {
        self.id.map(CustomerId::get)
    }
}
