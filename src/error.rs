//! Error types and handling for the portal client
//!
//! Each stage of the pipeline has its own error enum so callers can tell a
//! bad configuration from a rejected login or a failed data request. The
//! umbrella [`PortalError`] wraps them for code that only needs `?`.

use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Failure to parse an `H:MM` / `HH:MM` time of day
#[derive(Debug, Error)]
pub enum ParseError {
    /// No `:` between hour and minute
    #[error("missing ':' separator in time of day '{value}'")]
    MissingSeparator { value: String },

    /// Hour or minute part is empty
    #[error("empty hour or minute in time of day '{value}'")]
    EmptyComponent { value: String },

    /// Hour or minute is not a non-negative integer
    #[error("invalid number in time of day '{value}': {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Hour above 23 or minute above 59
    #[error("time of day '{value}' is out of range")]
    OutOfRange { value: String },
}

/// Configuration rejected at client construction
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no login or password specified")]
    MissingCredentials,

    #[error("failed to parse off-peak period #{index}: {source}")]
    InvalidOffpeakPeriod {
        index: usize,
        #[source]
        source: ParseError,
    },

    #[error("unknown time zone '{value}'")]
    InvalidTimezone { value: String },

    #[error("failed to build HTTP transport: {message}")]
    HttpClient { message: String },
}

/// Login handshake failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Login endpoint answered with a status >= 400
    #[error("login request failed with HTTP status {status}")]
    HttpFailure { status: u16 },

    /// Session-marker cookie missing or set to the logged-out sentinel
    #[error("credentials invalid: {reason}")]
    InvalidCredentials { reason: String },

    #[error("login transport error: {message}")]
    Transport { message: String },
}

/// Data retrieval failures; none of these invalidate the session
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("session is not authenticated")]
    NotAuthenticated,

    #[error("transport error: {message}")]
    TransportError { message: String },

    #[error("data request failed with HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("failed to decode consumption data: {message}")]
    DecodeError { message: String },

    #[error("invalid date range: {message}")]
    InvalidRange { message: String },
}

/// Main error type
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Time-series sink errors
    #[error("Sink error: {message}")]
    Sink { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl PortalError {
    /// Create a new sink error
    pub fn sink<S: Into<String>>(message: S) -> Self {
        PortalError::Sink {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        PortalError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        PortalError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        PortalError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for PortalError {
    fn from(err: serde_yaml::Error) -> Self {
        PortalError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::DecodeError {
                message: err.to_string(),
            }
        } else {
            FetchError::TransportError {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortalError::validation("portal.login", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Validation error: portal.login - must not be empty"
        );

        let err: PortalError = AuthError::HttpFailure { status: 500 }.into();
        assert_eq!(
            err.to_string(),
            "Authentication error: login request failed with HTTP status 500"
        );
    }

    #[test]
    fn test_nested_parse_error_is_source() {
        use std::error::Error as _;

        let parse = "x".parse::<u32>().unwrap_err();
        let err = ConfigError::InvalidOffpeakPeriod {
            index: 2,
            source: ParseError::InvalidNumber {
                value: "x:00".to_string(),
                source: parse,
            },
        };
        assert!(err.to_string().contains("#2"));
        assert!(err.source().is_some());
    }
}
