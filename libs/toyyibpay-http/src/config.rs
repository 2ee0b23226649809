use std::time::Duration;

use serde::{Deserialize, Serialize};

/// User-Agent sent when the caller does not pick one.
pub const DEFAULT_USER_AGENT: &str = concat!("toyyibpay-http/", env!("CARGO_PKG_VERSION"));

/// Where trusted root certificates come from.
///
/// Serialized as `"webpki"` or `"native"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Bundled Mozilla roots. Works in minimal containers.
    #[default]
    WebPki,
    /// The operating system's certificate store.
    Native,
}

/// Which URL schemes the client will dial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// `https://` only.
    #[default]
    TlsOnly,
    /// `http://` as well. For local mock servers: gateway requests carry
    /// account secrets in their bodies.
    AllowInsecureHttp,
}

/// Connection pool tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// How long an unused connection is kept. `None` keeps it forever.
    pub idle_timeout: Option<Duration>,
    /// Idle connections kept per host; `0` turns reuse off.
    pub max_idle_per_host: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Some(Duration::from_secs(90)),
            max_idle_per_host: 8,
        }
    }
}

/// Transport settings consumed by [`HttpClientBuilder`](crate::HttpClientBuilder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Upper bound on one round trip, body read excluded.
    pub request_timeout: Duration,
    /// Largest accepted response body, measured after decompression.
    pub max_body_size: usize,
    pub user_agent: String,
    pub transport: TransportSecurity,
    pub tls_roots: TlsRootConfig,
    pub pool: PoolConfig,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 << 20,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::default(),
            tls_roots: TlsRootConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}
