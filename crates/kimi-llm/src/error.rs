use thiserror::Error;

/// Unified error type for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Settings rejected before any network call; carries every
    /// validation message
    #[error("invalid settings: {}", .0.join("; "))]
    Config(Vec<String>),

    /// Connection failure or timeout
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the API
    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Malformed or unexpected response body
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
