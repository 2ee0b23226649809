use thiserror::Error;
use toyyibpay_http::HttpError;

use crate::operation::Operation;

/// A gateway call that failed.
///
/// Renders as `Error: Unable to <action> (<message>)`, where `<message>` is
/// the transport error text. The gateway's own error payload is never part
/// of the message: `toyyibPay` answers rejections with filler such as tab
/// runs, so only the status code is reported.
#[derive(Debug, Error)]
#[error("Error: Unable to {operation} ({message})")]
pub struct GatewayError {
    operation: Operation,
    message: String,
    #[source]
    source: HttpError,
}

impl GatewayError {
    pub(crate) fn new(operation: Operation, source: HttpError) -> Self {
        Self {
            operation,
            message: source.to_string(),
            source,
        }
    }

    /// The operation that failed.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The underlying transport message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying transport error.
    #[must_use]
    pub fn transport_error(&self) -> &HttpError {
        &self.source
    }
}

/// Errors raised while building a client from configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A configured base URL is unusable.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP transport could not be created.
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] HttpError),

    /// Configuration sources could not be merged or extracted.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn renders_legacy_error_line() {
        let err = GatewayError::new(
            Operation::GetBank,
            HttpError::HttpStatus {
                status: http_status(503),
                content_type: None,
            },
        );
        assert_eq!(
            err.to_string(),
            "Error: Unable to get bank list (Request failed with status code 503)"
        );
        assert_eq!(err.operation(), Operation::GetBank);
        assert_eq!(err.message(), "Request failed with status code 503");
    }

    #[test]
    fn keeps_transport_error_as_source() {
        let err = GatewayError::new(
            Operation::CreateUser,
            HttpError::Timeout(std::time::Duration::from_secs(2)),
        );
        assert!(matches!(err.transport_error(), HttpError::Timeout(_)));
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("Request timed out after 2s")
        );
        assert_eq!(
            err.to_string(),
            "Error: Unable to create user (Request timed out after 2s)"
        );
    }

    #[test]
    fn config_error_renders() {
        let err = ConfigError::InvalidBaseUrl {
            url: "toyyibpay".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid base URL 'toyyibpay': relative URL without a base"
        );
    }

    fn http_status(code: u16) -> toyyibpay_http::StatusCode {
        toyyibpay_http::StatusCode::from_u16(code).unwrap()
    }
}
