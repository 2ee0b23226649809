use std::fmt;

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use tower::util::BoxCloneSyncService;

use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;

/// The type-erased middleware stack; every clone of the client holds one.
pub(crate) type SharedService =
    BoxCloneSyncService<Request<Full<Bytes>>, Response<ResponseBody>, HttpError>;

/// Pooled HTTPS client.
///
/// `Clone + Send + Sync`. Clones share the connection pool, and concurrent
/// requests never wait on each other.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: SharedService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("transport_security", &self.transport_security)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Client with the default [`HttpClientConfig`](crate::HttpClientConfig).
    ///
    /// # Errors
    /// Returns `HttpError::Tls` if the root store cannot be set up.
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a GET to an absolute URL.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start a POST to an absolute URL; attach a body with
    /// [`RequestBuilder::json`].
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            self.transport_security,
            method,
            url.to_owned(),
        )
    }
}
