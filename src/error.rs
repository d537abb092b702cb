//! Error types and handling for StarCharge
//!
//! This module defines the crate-wide error type plus the two narrower
//! taxonomies surfaced to the outside world: setup errors (shown back to the
//! user as form codes) and fetch errors (reported to the scheduler).

use thiserror::Error;

/// Result type alias for StarCharge operations
pub type Result<T> = std::result::Result<T, StarChargeError>;

/// Main error type for StarCharge
#[derive(Debug, Error)]
pub enum StarChargeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP/Web server errors
    #[error("Web server error: {message}")]
    Web { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Network-related errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Vendor API errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl StarChargeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        StarChargeError::Config {
            message: message.into(),
        }
    }

    /// Create a new web error
    pub fn web<S: Into<String>>(message: S) -> Self {
        StarChargeError::Web {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        StarChargeError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        StarChargeError::Io {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        StarChargeError::Network {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        StarChargeError::Api {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        StarChargeError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        StarChargeError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StarChargeError {
    fn from(err: std::io::Error) -> Self {
        StarChargeError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for StarChargeError {
    fn from(err: serde_yaml::Error) -> Self {
        StarChargeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StarChargeError {
    fn from(err: serde_json::Error) -> Self {
        StarChargeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StarChargeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StarChargeError::timeout(err.to_string())
        } else {
            StarChargeError::network(err.to_string())
        }
    }
}

/// Errors raised while validating the user-supplied API configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The submitted text is not JSON
    #[error("Invalid JSON configuration")]
    InvalidJson,

    /// `url`, `method` or `headers` is missing or malformed
    #[error("Invalid API configuration")]
    InvalidApiConfig,

    /// The probe request did not come back with a success envelope
    #[error("Cannot connect to API")]
    CannotConnect,

    /// Anything else; logged and reported generically
    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl SetupError {
    /// Error code shown back on the setup form
    pub fn form_code(&self) -> &'static str {
        match self {
            SetupError::InvalidJson => "invalid_json",
            SetupError::InvalidApiConfig => "invalid_api_config",
            SetupError::CannotConnect => "cannot_connect",
            SetupError::Unknown(_) => "unknown",
        }
    }
}

/// Errors from a single poll of the vendor API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Error communicating with API: {0}")]
    Communication(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Invalid JSON response: {0}")]
    MalformedBody(String),

    #[error("API error: {0}")]
    ApiError(String),
}
