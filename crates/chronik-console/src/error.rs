//! Error types for the console.

use chronik_acl::AclModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Admin API error: {0}")]
    AdminApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Model(#[from] AclModelError),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

impl ConsoleError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ConsoleError::Http(_) | ConsoleError::AdminApi(_))
    }
}
