//! External sink errors
//!
//! Native failures of the SMTP and HTTP clients, and their mapping onto
//! [`PortError`]:
//!
//! - 401/403 -> `PortError::Unauthorized`
//! - 404 -> `PortError::NotFound`
//! - 408, 429, 5xx -> `PortError::ServiceUnavailable`
//! - timeouts -> `PortError::Timeout`
//! - connect failures and transient (4xx) SMTP replies -> `PortError::Connection`

use core_kernel::PortError;
use thiserror::Error;

/// Errors raised by the external sink adapters
#[derive(Debug, Error)]
pub enum ExternalError {
    /// A sender or recipient address could not be parsed
    #[error("Invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The email message could not be built
    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP relay rejected or failed the delivery
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The object store answered with a non-success status
    #[error("Object store returned {status} for {operation}: {body}")]
    HttpStatus {
        operation: String,
        status: u16,
        body: String,
    },

    /// The HTTP request could not be completed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file storage failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The adapter settings are unusable
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ExternalError {
    pub fn invalid_address(address: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        ExternalError::InvalidAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<ExternalError> for PortError {
    fn from(error: ExternalError) -> Self {
        match error {
            ExternalError::InvalidAddress { .. } | ExternalError::Message(_) => {
                PortError::validation(error.to_string())
            }
            ExternalError::Smtp(e) if e.is_transient() => {
                PortError::connection_with_source("SMTP relay unavailable", e)
            }
            ExternalError::HttpStatus { status, ref operation, .. } => {
                status_to_port_error(status, operation, error.to_string())
            }
            ExternalError::Http(ref e) if e.is_timeout() => PortError::Timeout {
                operation: "object store request".to_string(),
                duration_ms: 0,
            },
            ExternalError::Http(e) if e.is_connect() => {
                PortError::connection_with_source("object store unreachable", e)
            }
            ExternalError::Configuration(msg) => PortError::validation(msg),
            other => PortError::internal(other.to_string()),
        }
    }
}

fn status_to_port_error(status: u16, operation: &str, message: String) -> PortError {
    match status {
        401 | 403 => PortError::Unauthorized { message },
        404 => PortError::not_found("object store resource", operation),
        408 | 429 | 500..=599 => PortError::ServiceUnavailable {
            service: format!("object store ({})", status),
        },
        _ => PortError::internal(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_status(status: u16) -> PortError {
        ExternalError::HttpStatus {
            operation: "PUT dent.jpg".to_string(),
            status,
            body: String::new(),
        }
        .into()
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(http_status(403), PortError::Unauthorized { .. }));
        assert!(http_status(404).is_not_found());
        assert!(http_status(503).is_transient());
        assert!(http_status(429).is_transient());
        assert!(matches!(http_status(400), PortError::Internal { .. }));
    }

    #[test]
    fn test_address_errors_are_validation() {
        let port: PortError = ExternalError::invalid_address("nobody", "missing domain").into();
        assert!(matches!(port, PortError::Validation { .. }));
        assert!(port.to_string().contains("nobody"));
    }
}
