//! Error taxonomy for the data layer.
//!
//! Every failure a repository can hit while fetching content is a
//! `FetchError`. Repositories catch these at their boundary and degrade
//! to an empty result; nothing in the data layer retries.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Bad database id, or the database is not shared with the integration.
    #[error("database not found: check the database id and share it with the integration")]
    NotFound,
    /// Bad or expired integration token.
    #[error("notion authentication failed")]
    Unauthorized,
    /// Any other non-2xx response from the API.
    #[error("notion api error {status}: {message}")]
    Api { status: u16, message: String },
    /// Network-level failure reaching the API.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The cursor chain exceeded the hard pagination bound.
    #[error("pagination exceeded {0} rounds; aborting query")]
    PaginationLimit(usize),
}

impl FetchError {
    /// Map a non-success HTTP status plus the error body Notion returned.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => FetchError::NotFound,
            401 => FetchError::Unauthorized,
            _ => FetchError::Api { status, message },
        }
    }
}
