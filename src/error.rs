//! Error type shared by the client, the report renderers and the config loader.

use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("invalid tree structure: {0}")]
    InvalidTree(String),

    #[error("invalid statistics: {0}")]
    InvalidStats(String),

    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() { Error::Decode(err.to_string()) } else { Error::Network(Arc::new(err)) }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
