//! Form definitions backing the console routes.
//!
//! Forms are deserialized with `serde_html_form`, validated with `validator`
//! and converted into typed payloads before anything reaches the backend.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod addresses;
pub mod catalog;
pub mod customers;
pub mod orders;
pub mod statistics;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form data: {0}")]
    Malformed(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("invalid identifier")]
    InvalidId,

    #[error("price must be at least 0.01 with at most two decimals")]
    InvalidPrice,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("invalid date `{0}`")]
    InvalidDate(String),

    #[error("order date cannot be in the future")]
    FutureDate,

    #[error("an order needs at least one line")]
    EmptyOrder,

    #[error("{0}")]
    Constraint(#[from] TypeConstraintError),
}

/// Decodes an urlencoded form body.
pub fn parse_form<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, FormError> {
    serde_html_form::from_bytes(body).map_err(|err| FormError::Malformed(err.to_string()))
}

/// Maps a name constraint failure onto the field that was empty.
fn required(field: &'static str) -> impl Fn(TypeConstraintError) -> FormError {
    move |_| FormError::EmptyField(field)
}

/// Optional free text: trimmed, `None` when blank.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
