use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, Uri};
use http_body_util::Full;
use serde::Serialize;
use tower::ServiceExt;

use crate::client::SharedService;
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;

const APPLICATION_JSON: &str = "application/json";

/// One pending request. Nothing is sent until [`send`](Self::send).
///
/// ```ignore
/// let resp = client
///     .post("https://toyyibpay.com/index.php/api/createAccount")
///     .json(&new_user)?
///     .send()
///     .await?;
/// ```
#[must_use = "a RequestBuilder does nothing until .send() is awaited"]
pub struct RequestBuilder {
    service: SharedService,
    max_body_size: usize,
    transport_security: TransportSecurity,
    method: Method,
    url: String,
    body: Option<Bytes>,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: SharedService,
        max_body_size: usize,
        transport_security: TransportSecurity,
        method: Method,
        url: String,
    ) -> Self {
        Self {
            service,
            max_body_size,
            transport_security,
            method,
            url,
            body: None,
        }
    }

    /// Serialize `body` as the JSON request payload.
    ///
    /// # Errors
    /// Returns `HttpError::Json` if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Perform the round trip.
    ///
    /// Every HTTP status is `Ok`; use [`HttpResponse::checked_bytes`] or
    /// [`HttpResponse::error_for_status`] to reject non-2xx answers.
    ///
    /// # Errors
    /// - `InvalidUri` / `InvalidScheme` if the URL is refused up front
    /// - `Timeout` if no response arrives in time
    /// - `Transport` / `Tls` for connection failures
    pub async fn send(self) -> Result<HttpResponse, HttpError> {
        let uri = checked_uri(&self.url, self.transport_security)?;

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri)
            .header(ACCEPT, APPLICATION_JSON);
        if self.body.is_some() {
            request = request.header(CONTENT_TYPE, APPLICATION_JSON);
        }
        let request = request.body(Full::new(self.body.unwrap_or_default()))?;

        let inner = self.service.oneshot(request).await?;
        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}

/// Parse `url` and make sure the transport is allowed to dial it.
fn checked_uri(url: &str, security: TransportSecurity) -> Result<Uri, HttpError> {
    let invalid = |kind, reason: String| HttpError::InvalidUri {
        url: url.to_owned(),
        kind,
        reason,
    };

    let uri: Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;

    let Some(scheme) = uri.scheme_str() else {
        let kind = if uri.authority().is_none() {
            InvalidUriKind::MissingAuthority
        } else {
            InvalidUriKind::MissingScheme
        };
        return Err(invalid(kind, "absolute http(s) URL required".to_owned()));
    };
    if uri.authority().is_none() {
        return Err(invalid(InvalidUriKind::MissingAuthority, "missing host".to_owned()));
    }

    match (scheme, security) {
        ("https", _) | ("http", TransportSecurity::AllowInsecureHttp) => Ok(uri),
        ("http", _) => Err(HttpError::InvalidScheme {
            scheme: "http".to_owned(),
            reason: "plain HTTP is disabled for this client".to_owned(),
        }),
        (other, _) => Err(HttpError::InvalidScheme {
            scheme: other.to_owned(),
            reason: "only http and https are supported".to_owned(),
        }),
    }
}
