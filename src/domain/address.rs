use serde::{Deserialize, Serialize};

use crate::domain::Entity;
use crate::domain::types::AddressId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
}

impl Address {
    /// One-line rendering used in customer tables and selects.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!(
                "{}, {}, {} {}",
                self.street, self.city, state, self.postal_code
            ),
            None => format!("{}, {} {}", self.street, self.city, self.postal_code),
        }
    }
}

impl Entity for Address {
    fn entity_id(&self) -> Option<i64> {
        self.id.map(AddressId::get)
    }
}
