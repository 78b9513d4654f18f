//! Error types for Readiego

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReadiegoError>;

#[derive(Error, Debug)]
pub enum ReadiegoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A query failed; displays the user-facing message
    #[error("{0}")]
    Query(#[from] crate::service::QueryError),

    /// A failure the query controller recorded without returning it
    #[error("{0}")]
    Recorded(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl ReadiegoError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ReadiegoError::InvalidInput(_) => 3,
            ReadiegoError::Api(_) => 1,
            ReadiegoError::Query(_) => 1,
            ReadiegoError::Recorded(_) => 1,
            ReadiegoError::Config(_) => 1,
            ReadiegoError::Output(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Failures reported by an [`ApiClient`](crate::api::ApiClient).
///
/// Transport failures and "not found" answers stay distinguishable here so
/// they can be logged precisely, even though the query layer maps all of
/// them to the same user-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// True when the server answered 404 for the requested identifier
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// True for failures that never reached a server response
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
