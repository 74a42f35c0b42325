//! Error types and handling for the `TaxiFare` application

use serde::Serialize;
use thiserror::Error;

/// Main error type for the `TaxiFare` application
#[derive(Error, Debug)]
pub enum TaxiFareError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors (non-numeric coordinates, missing fields, ...)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Collaborator unreachable or timed out
    #[error("Network error: {message}")]
    Network { message: String },

    /// Collaborator answered with a non-200 status
    #[error("Request failed with status code {code}")]
    UpstreamStatus { code: u16 },

    /// Collaborator body could not be decoded
    #[error("Error parsing response: {message}")]
    Parse { message: String },

    /// Geocoding found nothing for the address
    #[error("Address not found: {address}")]
    NotFound { address: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Coarse category of a [`TaxiFareError`], stable across messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Config,
    Validation,
    Network,
    UpstreamStatus,
    Parse,
    NotFound,
    Io,
}

impl TaxiFareError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new not-found error for an address
    pub fn not_found<S: Into<String>>(address: S) -> Self {
        Self::NotFound {
            address: address.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaxiFareError::Config { .. } => ErrorKind::Config,
            TaxiFareError::Validation { .. } => ErrorKind::Validation,
            TaxiFareError::Network { .. } => ErrorKind::Network,
            TaxiFareError::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            TaxiFareError::Parse { .. } => ErrorKind::Parse,
            TaxiFareError::NotFound { .. } => ErrorKind::NotFound,
            TaxiFareError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TaxiFareError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            TaxiFareError::Validation { message } => format!("Invalid input: {message}"),
            TaxiFareError::Network { message } => format!("Request failed: {message}"),
            TaxiFareError::UpstreamStatus { code } => {
                format!("Request failed with status code {code}")
            }
            TaxiFareError::Parse { message } => format!("Error parsing JSON response: {message}"),
            TaxiFareError::NotFound { address } => format!("Address not found: {address}"),
            TaxiFareError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
