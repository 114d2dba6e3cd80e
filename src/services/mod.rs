//! Use cases behind the console routes.
//!
//! Every function is generic over the repository traits it needs so it can be
//! exercised against in-memory or `mockall` repositories.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::export::ExportError;
use crate::forms::FormError;
use crate::query::QueryError;
use crate::repository::errors::RepositoryError;

pub mod addresses;
pub mod catalog;
pub mod customers;
pub mod listing;
pub mod orders;
pub mod products;
pub mod statistics;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("entity not found")]
    NotFound,

    /// User input rejected before any backend call. The message is shown as is.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("export failed: {0}")]
    Export(String),

    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

impl From<ExportError> for ServiceError {
    fn from(err: ExportError) -> Self {
        ServiceError::Export(err.to_string())
    }
}

/// Converts a raw path id, treating non-positive values as missing entities.
fn existing_id<I, F>(raw: i64, new: F) -> ServiceResult<I>
where
    F: FnOnce(i64) -> Result<I, TypeConstraintError>,
{
    new(raw).map_err(|_| ServiceError::NotFound)
}
