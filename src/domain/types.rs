//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email, two-decimal prices) so that once a value
//! passed local validation it can be sent to the backend as-is.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Price is below one cent or carries more than two decimals.
    #[error("invalid price")]
    InvalidPrice,
    /// Quantity is out of the accepted range.
    #[error("invalid quantity")]
    InvalidQuantity,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive backend identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(AddressId, "Backend identifier of a postal address.");
id_newtype!(CustomerId, "Backend identifier of a customer.");
id_newtype!(CategoryId, "Backend identifier of a product category.");
id_newtype!(SubCategoryId, "Backend identifier of a product subcategory.");
id_newtype!(ProductId, "Backend identifier of a product.");
id_newtype!(OrderId, "Backend identifier of an order header.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

non_empty_string_newtype!(Street, "Street line of an address.");
non_empty_string_newtype!(City, "City name of an address.");
non_empty_string_newtype!(PostalCode, "Postal code of an address.");
non_empty_string_newtype!(PersonName, "First or last name of a customer.");
non_empty_string_newtype!(Sku, "Stock keeping unit of a product.");
non_empty_string_newtype!(
    EntityName,
    "Display name of a product, category or subcategory."
);

/// Product price with at most two decimals, at least one cent.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Validates the amount against the backend's `DecimalMin("0.01")` and
    /// two-fraction-digit rules.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if !value.is_finite() || value < 0.01 {
            return Err(TypeConstraintError::InvalidPrice);
        }
        let cents = value * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err(TypeConstraintError::InvalidPrice);
        }
        Ok(Self(value))
    }

    /// Parses a decimal string as typed into a form.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let amount = value
            .trim()
            .parse::<f64>()
            .map_err(|_| TypeConstraintError::InvalidPrice)?;
        Self::new(amount)
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

/// Strictly positive quantity of an order line.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v >= 1)
            .map(Self)
            .ok_or(TypeConstraintError::InvalidQuantity)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(AddressId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(CustomerId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(ProductId::new(7).map(ProductId::get), Ok(7));
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = Email::new("  Jane.Doe@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "jane.doe@example.com");
        assert_eq!(Email::new("not-an-email"), Err(TypeConstraintError::InvalidEmail));
    }

    #[test]
    fn names_reject_blank_input() {
        assert_eq!(City::new("   "), Err(TypeConstraintError::EmptyString));
        assert_eq!(City::new(" Berlin ").unwrap().as_str(), "Berlin");
    }

    #[test]
    fn price_enforces_minimum_and_two_decimals() {
        assert_eq!(Price::parse("19.99").unwrap().get(), 19.99);
        assert_eq!(Price::parse("0.001"), Err(TypeConstraintError::InvalidPrice));
        assert_eq!(Price::parse("0"), Err(TypeConstraintError::InvalidPrice));
        assert_eq!(Price::parse("1.234"), Err(TypeConstraintError::InvalidPrice));
        assert_eq!(Price::parse("abc"), Err(TypeConstraintError::InvalidPrice));
    }

    #[test]
    fn quantity_must_be_at_least_one() {
        assert_eq!(Quantity::new(0), Err(TypeConstraintError::InvalidQuantity));
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }
}
