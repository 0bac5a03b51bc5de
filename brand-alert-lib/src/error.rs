//! Error handling for BrandAlert API operations.
//!
//! This module defines a single error type covering every way a call can fail,
//! from local parameter validation through HTTP status handling to response
//! parsing. Transport failures (`Network`, `Timeout`) are not API errors.

use crate::models::ErrorMessage;
use std::fmt;
use std::time::Duration;

/// Main error type for BrandAlert API operations.
#[derive(Debug, Clone)]
pub enum BrandAlertError {
    /// A call parameter failed local validation
    Parameter { message: String },

    /// The client has no API key configured
    EmptyApiKey,

    /// Server rejected the credentials (HTTP 401, 402 or 403)
    ApiAuth { status: u16, body: String },

    /// Server rejected the request payload (HTTP 400 or 422)
    BadRequest { status: u16, body: String },

    /// Any other HTTP status of 300 or above
    HttpApi { status: u16, body: String },

    /// A decoded server-side error message
    Response { error: ErrorMessage },

    /// Response body could not be turned into a `Response`
    UnparsableResponse {
        message: String,
        source: Option<String>,
    },

    /// Network-related errors (DNS, connection refused, TLS, etc.)
    Network {
        message: String,
        source: Option<String>,
    },

    /// The transport gave up waiting for the server
    Timeout {
        operation: String,
        duration: Option<Duration>,
    },

    /// Configuration errors (unreadable file, invalid values, etc.)
    Config { message: String },
}

impl BrandAlertError {
    /// Create a new parameter validation error.
    pub fn parameter<M: Into<String>>(message: M) -> Self {
        Self::Parameter {
            message: message.into(),
        }
    }

    /// Map an unsuccessful HTTP status to the matching error kind.
    ///
    /// Returns `None` for statuses below 300.
    pub fn from_status<B: Into<String>>(status: u16, body: B) -> Option<Self> {
        let body = body.into();
        match status {
            401..=403 => Some(Self::ApiAuth { status, body }),
            400 | 422 => Some(Self::BadRequest { status, body }),
            s if s >= 300 => Some(Self::HttpApi { status, body }),
            _ => None,
        }
    }

    /// Create a new unparsable response error.
    pub fn unparsable<M: Into<String>>(message: M) -> Self {
        Self::UnparsableResponse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new unparsable response error with the underlying cause.
    pub fn unparsable_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::UnparsableResponse {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error belongs to the API error family.
    ///
    /// Transport failures and local configuration problems are not API errors.
    pub fn is_api_error(&self) -> bool {
        !matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::Config { .. }
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiAuth { status, .. }
            | Self::BadRequest { status, .. }
            | Self::HttpApi { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body carried by the error, if any.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::ApiAuth { body, .. }
            | Self::BadRequest { body, .. }
            | Self::HttpApi { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Server error message, decoded from the carried body when possible.
    ///
    /// Bodies that are not a JSON object yield `None`.
    pub fn server_message(&self) -> Option<ErrorMessage> {
        if let Self::Response { error } = self {
            return Some(error.clone());
        }
        let body = self.raw_body()?;
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        if value.is_object() {
            Some(ErrorMessage::from_value(Some(&value)))
        } else {
            None
        }
    }
}

impl fmt::Display for BrandAlertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parameter { message } => write!(f, "Parameter error: {}", message),
            Self::EmptyApiKey => write!(f, "API key is empty"),
            Self::ApiAuth { status, body } => {
                write!(f, "Authentication failed (HTTP {}): {}", status, body)
            }
            Self::BadRequest { status, body } => {
                write!(f, "Bad request (HTTP {}): {}", status, body)
            }
            Self::HttpApi { status, body } => write!(f, "HTTP error {}: {}", status, body),
            Self::Response { error } => write!(f, "API returned an error: {}", error),
            Self::UnparsableResponse { message, source } => {
                if let Some(source) = source {
                    write!(f, "Unparsable API response: {} (source: {})", message, source)
                } else {
                    write!(f, "Unparsable API response: {}", message)
                }
            }
            Self::Network { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::Timeout {
                operation,
                duration,
            } => match duration {
                Some(duration) => write!(f, "Timeout after {:?} during: {}", duration, operation),
                None => write!(f, "Timeout during: {}", operation),
            },
            Self::Config { message } => write!(f, "Configuration error: {}", message),
        }
    }
}

impl std::error::Error for BrandAlertError {}

impl From<reqwest::Error> for BrandAlertError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                operation: "HTTP request".to_string(),
                duration: None,
            }
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for BrandAlertError {
    fn from(err: serde_json::Error) -> Self {
        Self::unparsable_with_source("Could not parse API response", err.to_string())
    }
}

impl From<toml::de::Error> for BrandAlertError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        for status in [401, 402, 403] {
            assert!(matches!(
                BrandAlertError::from_status(status, ""),
                Some(BrandAlertError::ApiAuth { .. })
            ));
        }
        for status in [400, 422] {
            assert!(matches!(
                BrandAlertError::from_status(status, ""),
                Some(BrandAlertError::BadRequest { .. })
            ));
        }
        for status in [300, 404, 429, 500, 503] {
            assert!(matches!(
                BrandAlertError::from_status(status, ""),
                Some(BrandAlertError::HttpApi { .. })
            ));
        }
        assert!(BrandAlertError::from_status(200, "").is_none());
        assert!(BrandAlertError::from_status(204, "").is_none());
        assert!(BrandAlertError::from_status(299, "").is_none());
    }

    #[test]
    fn test_status_and_body_are_kept() {
        let err = BrandAlertError::from_status(403, "denied").unwrap();
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.raw_body(), Some("denied"));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_server_message_from_body() {
        let err = BrandAlertError::from_status(
            403,
            r#"{"code": 403, "messages": "Access restricted."}"#,
        )
        .unwrap();
        let message = err.server_message().unwrap();
        assert_eq!(message.code, 403);
        assert_eq!(message.message, "Access restricted.");

        let err = BrandAlertError::from_status(500, "<html>oops</html>").unwrap();
        assert!(err.server_message().is_none());

        let err = message.into_error();
        assert!(matches!(err, BrandAlertError::Response { .. }));
        assert_eq!(err.server_message().unwrap().code, 403);
        assert_eq!(err.to_string(), "API returned an error: 403: Access restricted.");
    }

    #[test]
    fn test_api_error_family() {
        assert!(BrandAlertError::parameter("bad").is_api_error());
        assert!(BrandAlertError::EmptyApiKey.is_api_error());
        assert!(BrandAlertError::unparsable("x").is_api_error());
        assert!(!BrandAlertError::network_with_source("down", "refused").is_api_error());
        assert!(!BrandAlertError::config("bad file").is_api_error());
    }

    #[test]
    fn test_display_includes_source() {
        let err = BrandAlertError::unparsable_with_source("Could not parse API response", "EOF");
        assert_eq!(
            err.to_string(),
            "Unparsable API response: Could not parse API response (source: EOF)"
        );
    }
}
