use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Why a URL was refused before any connection was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    /// Not a URI at all.
    ParseError,
    /// No host to connect to (e.g. a bare path).
    MissingAuthority,
    /// No `http`/`https` prefix.
    MissingScheme,
}

/// Everything that can go wrong on one round trip.
///
/// `Display` texts are caller-visible: the gateway client embeds them in its
/// own error messages.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// A header value (e.g. the configured User-Agent) is not valid ASCII.
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connect, DNS or protocol failure below HTTP. The message includes
    /// every cause, e.g. `client error (Connect): tcp connect error:
    /// Connection refused (os error 111)`.
    #[error("Transport error: {}", Causes(.0))]
    Transport(#[source] BoxError),

    #[error("TLS error: {}", Causes(.0))]
    Tls(#[source] BoxError),

    #[error("Response body exceeds {limit} bytes (read {actual})")]
    BodyTooLarge { limit: usize, actual: usize },

    /// Non-2xx answer. Only the status is kept; the body is never read.
    #[error("Request failed with status code {}", .status.as_u16())]
    HttpStatus {
        status: http::StatusCode,
        content_type: Option<String>,
    },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        /// Match on this; `reason` is free text.
        kind: InvalidUriKind,
        reason: String,
    },

    #[error("URL scheme '{scheme}' not allowed: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

/// An error and its `source()` chain, joined with `": "`.
struct Causes<'a>(&'a BoxError);

impl fmt::Display for Causes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.0.to_string();
        f.write_str(&shown)?;
        let mut next = self.0.source();
        while let Some(cause) = next {
            let text = cause.to_string();
            // wrappers that forward Display would repeat the same text
            if text != shown {
                write!(f, ": {text}")?;
                shown = text;
            }
            next = cause.source();
        }
        Ok(())
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
