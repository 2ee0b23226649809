use bytes::{Bytes, BytesMut};
use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;

use crate::error::{BoxError, HttpError};

/// Response body after the decompression layer.
pub type ResponseBody = BoxBody<Bytes, BoxError>;

/// A received response whose body has not been read yet.
///
/// Every body read stops at the client's `max_body_size`, counted on
/// decompressed bytes.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Fail on non-2xx without touching the body.
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` for any non-2xx status.
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        match self.status_error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// The whole body, whatever the status.
    ///
    /// # Errors
    /// `BodyTooLarge` past the limit, `Transport` if the stream breaks.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        collect_limited(self.inner.into_body(), self.max_body_size).await
    }

    /// The whole body of a 2xx response. Other statuses fail and their body
    /// is dropped unread.
    ///
    /// # Errors
    /// `HttpStatus` for non-2xx, otherwise as [`bytes`](Self::bytes).
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        self.error_for_status()?.bytes().await
    }

    fn status_error(&self) -> Option<HttpError> {
        let status = self.inner.status();
        if status.is_success() {
            return None;
        }
        let content_type = self
            .inner
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        Some(HttpError::HttpStatus {
            status,
            content_type,
        })
    }
}

/// Read frames until the body ends or `limit` would be exceeded, so a small
/// compressed payload cannot expand without bound.
async fn collect_limited(mut body: ResponseBody, limit: usize) -> Result<Bytes, HttpError> {
    let mut buf = BytesMut::new();
    while let Some(frame) = body.frame().await {
        let Ok(data) = frame.map_err(HttpError::Transport)?.into_data() else {
            continue;
        };
        let actual = buf.len() + data.len();
        if actual > limit {
            return Err(HttpError::BodyTooLarge { limit, actual });
        }
        buf.extend_from_slice(&data);
    }
    Ok(buf.freeze())
}
