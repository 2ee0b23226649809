use std::time::Duration;

use bytes::Bytes;
use http::header::{HeaderValue, USER_AGENT};
use http::Response;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;
use tower_http::set_header::SetRequestHeaderLayer;

use crate::client::HttpClient;
use crate::config::{HttpClientConfig, TlsRootConfig, TransportSecurity};
use crate::error::HttpError;
use crate::response::ResponseBody;
use crate::tls;

/// Fluent construction of an [`HttpClient`].
///
/// ```ignore
/// let http = HttpClientBuilder::new()
///     .timeout(Duration::from_secs(15))
///     .user_agent("my-shop/1.0")
///     .build()?;
/// ```
#[derive(Debug, Default)]
#[must_use]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Cap on the decompressed response body.
    pub fn max_body_size(mut self, bytes: usize) -> Self {
        self.config.max_body_size = bytes;
        self
    }

    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Shorthand for `.transport(TransportSecurity::AllowInsecureHttp)`.
    ///
    /// Compiled into debug builds, or release builds with the
    /// `allow-insecure-http` feature.
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(self) -> Self {
        self.transport(TransportSecurity::AllowInsecureHttp)
    }

    /// `None` keeps idle connections until the server closes them.
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.pool.idle_timeout = timeout;
        self
    }

    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool.max_idle_per_host = max;
        self
    }

    /// Assemble the service stack, outermost first:
    /// timeout, User-Agent, decompression, pooled hyper client.
    ///
    /// Any HTTP status is a successful response at this level.
    ///
    /// # Errors
    /// Returns `HttpError::InvalidHeaderValue` for an unusable user agent and
    /// `HttpError::Tls` if the root store cannot be set up.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let HttpClientConfig {
            request_timeout,
            max_body_size,
            user_agent,
            transport,
            tls_roots,
            pool,
        } = self.config;

        if transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                target: "toyyibpay_http::security",
                "insecure HTTP enabled; requests to http:// URLs are sent unencrypted"
            );
        }

        let user_agent = HeaderValue::try_from(user_agent)?;
        let connector = https_connector(tls_roots, transport)?;

        let mut pooled = Client::builder(TokioExecutor::new());
        // the idle timeout is only enforced when a timer is set
        pooled
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(pool.idle_timeout)
            .pool_max_idle_per_host(pool.max_idle_per_host);
        let hyper_client = pooled.build::<_, Full<Bytes>>(connector);

        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(request_timeout))
            .layer(SetRequestHeaderLayer::if_not_present(USER_AGENT, user_agent))
            .layer(DecompressionLayer::new())
            .service(hyper_client)
            .map_response(box_body)
            .map_err(move |err: BoxError| classify(err, request_timeout));

        Ok(HttpClient {
            service: BoxCloneSyncService::new(service),
            max_body_size,
            transport_security: transport,
        })
    }
}

fn https_connector(
    roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let schemes = tls::connector_builder(roots)?;
    let connector = match transport {
        TransportSecurity::AllowInsecureHttp => schemes.https_or_http(),
        TransportSecurity::TlsOnly => schemes.https_only(),
    };
    Ok(connector.enable_all_versions().build())
}

/// Turn a stack error back into an `HttpError`.
fn classify(err: BoxError, timeout: Duration) -> HttpError {
    if err.is::<Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    match err.downcast::<hyper_util::client::legacy::Error>() {
        Ok(legacy) => HttpError::from(*legacy),
        Err(other) => HttpError::Transport(other),
    }
}

fn box_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<BoxError>,
{
    response.map(|body| body.map_err(Into::into).boxed())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use tracing_test::traced_test;

    #[test]
    fn starts_from_default_config() {
        let builder = HttpClientBuilder::new();
        assert_eq!(builder.config, HttpClientConfig::default());
        assert_eq!(builder.config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn setters_write_config() {
        let builder = HttpClientBuilder::with_config(HttpClientConfig::default())
            .timeout(Duration::from_secs(5))
            .user_agent("shop/1.0")
            .max_body_size(2048)
            .tls_roots(TlsRootConfig::Native)
            .pool_idle_timeout(None)
            .pool_max_idle_per_host(0);

        let cfg = &builder.config;
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.user_agent, "shop/1.0");
        assert_eq!(cfg.max_body_size, 2048);
        assert_eq!(cfg.tls_roots, TlsRootConfig::Native);
        assert_eq!(cfg.pool.idle_timeout, None);
        assert_eq!(cfg.pool.max_idle_per_host, 0);
    }

    #[test]
    fn insecure_shorthand_matches_transport() {
        let a = HttpClientBuilder::new().allow_insecure_http();
        let b = HttpClientBuilder::new().transport(TransportSecurity::AllowInsecureHttp);
        assert_eq!(a.config.transport, b.config.transport);
    }

    #[test]
    fn builds_with_bundled_roots() {
        assert!(HttpClientBuilder::new().build().is_ok());
    }

    #[test]
    fn rejects_unprintable_user_agent() {
        let result = HttpClientBuilder::new().user_agent("bad\nagent").build();
        assert!(matches!(result, Err(HttpError::InvalidHeaderValue(_))));
    }

    #[test]
    fn elapsed_becomes_timeout() {
        let mapped = classify(Box::new(Elapsed::new()), Duration::from_secs(3));
        assert!(matches!(mapped, HttpError::Timeout(d) if d == Duration::from_secs(3)));
    }

    #[test]
    fn other_errors_become_transport() {
        let mapped = classify("socket closed".into(), Duration::from_secs(3));
        assert_eq!(mapped.to_string(), "Transport error: socket closed");
    }

    #[test]
    #[traced_test]
    fn insecure_transport_logs_warning() {
        HttpClientBuilder::new()
            .transport(TransportSecurity::AllowInsecureHttp)
            .build()
            .unwrap();
        assert!(logs_contain("insecure HTTP enabled"));
    }

    #[test]
    #[traced_test]
    fn tls_only_is_quiet() {
        HttpClientBuilder::new().build().unwrap();
        assert!(!logs_contain("insecure HTTP enabled"));
    }
}
