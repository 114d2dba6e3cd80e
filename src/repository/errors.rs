use thiserror::Error;

/// Failure of a backend call.
///
/// Cloneable so every caller joined on one cached request observes the same
/// error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => RepositoryError::NotFound,
            400..=499 => RepositoryError::Rejected { status, message },
            _ => RepositoryError::Backend { status, message },
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RepositoryError::Timeout
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if err.is_connect() || err.is_request() {
            RepositoryError::ConnectionError(err.to_string())
        } else {
            RepositoryError::Unexpected(err.to_string())
        }
    }
}
