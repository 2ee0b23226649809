//! Gateway configuration.
//!
//! Every field has a default, so an empty source yields a client for the
//! public `toyyibPay` hosts. Sources are layered with figment:
//!
//! ```yaml
//! # toyyibpay.yaml
//! timeout: 15s
//! development_url: https://dev.toyyibpay.com
//! ```
//!
//! ```text
//! TOYYIBPAY_TIMEOUT=5s
//! TOYYIBPAY_PRODUCTION_URL=https://toyyibpay.com
//! TOYYIBPAY_TLS_ROOTS=native
//! ```

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use toyyibpay_http::{HttpClientConfig, PoolConfig, TlsRootConfig, TransportSecurity};

use crate::error::ConfigError;

/// Production host.
pub const PRODUCTION_URL: &str = "https://toyyibpay.com";

/// Sandbox host.
pub const DEVELOPMENT_URL: &str = "https://dev.toyyibpay.com";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TOYYIBPAY_";

/// Default user agent sent to the gateway.
pub const DEFAULT_USER_AGENT: &str = concat!("toyyibpay/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToyyibPayConfig {
    /// Base URL used when `dev` is off. `/index.php/api` is appended.
    pub production_url: String,

    /// Base URL used when `dev` is on.
    pub development_url: String,

    /// Per-request timeout, e.g. `"30s"` or `"1m 30s"`.
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    pub user_agent: String,

    /// Accept `http://` base URLs. Only meant for local mock servers.
    pub allow_insecure_http: bool,

    /// `webpki` (bundled roots) or `native` (OS store).
    pub tls_roots: TlsRootConfig,

    /// Largest accepted response body in bytes, after decompression.
    pub max_body_size: usize,

    /// How long an unused pooled connection is kept.
    #[serde(with = "humantime_duration")]
    pub pool_idle_timeout: Duration,

    /// Idle connections kept per host; `0` disables reuse.
    pub pool_max_idle_per_host: usize,
}

impl Default for ToyyibPayConfig {
    fn default() -> Self {
        Self {
            production_url: PRODUCTION_URL.to_owned(),
            development_url: DEVELOPMENT_URL.to_owned(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            allow_insecure_http: false,
            tls_roots: TlsRootConfig::default(),
            max_body_size: 10 << 20,
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 8,
        }
    }
}

impl ToyyibPayConfig {
    /// Layered sources: defaults, then the YAML file (if given), then
    /// `TOYYIBPAY_*` environment variables.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Extract the configuration from a prepared figment.
    ///
    /// # Errors
    /// Returns `ConfigError::Load` if a source is malformed or a value has
    /// the wrong type.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(Box::new).map_err(ConfigError::from)
    }

    /// Transport settings for the gateway's HTTP client.
    #[must_use]
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.timeout,
            max_body_size: self.max_body_size,
            user_agent: self.user_agent.clone(),
            transport: if self.allow_insecure_http {
                TransportSecurity::AllowInsecureHttp
            } else {
                TransportSecurity::TlsOnly
            },
            tls_roots: self.tls_roots,
            pool: PoolConfig {
                idle_timeout: Some(self.pool_idle_timeout),
                max_idle_per_host: self.pool_max_idle_per_host,
            },
        }
    }

    /// Shorthand for `from_figment(&ToyyibPayConfig::figment(path))`.
    ///
    /// # Errors
    /// See [`ToyyibPayConfig::from_figment`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(path))
    }
}

/// Durations as humantime strings (`"30s"`, `"1m 30s"`).
mod humantime_duration {
    use std::fmt;
    use std::time::Duration;

    use serde::{Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        struct V;

        impl de::Visitor<'_> for V {
            type Value = Duration;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a duration such as \"30s\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
                humantime::parse_duration(v)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        d.deserialize_str(V)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_point_at_public_hosts() {
        let cfg = ToyyibPayConfig::default();
        assert_eq!(cfg.production_url, "https://toyyibpay.com");
        assert_eq!(cfg.development_url, "https://dev.toyyibpay.com");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert!(cfg.user_agent.starts_with("toyyibpay/"));
        assert!(!cfg.allow_insecure_http);
        assert_eq!(cfg.tls_roots, TlsRootConfig::WebPki);
    }

    #[test]
    fn empty_figment_gives_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = ToyyibPayConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg, ToyyibPayConfig::default());
            Ok(())
        });
    }

    #[test]
    fn yaml_then_env_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "toyyibpay.yaml",
                "timeout: 1m 30s\ndevelopment_url: https://staging.example.com\nuser_agent: shop/1.0\n",
            )?;
            jail.set_env("TOYYIBPAY_USER_AGENT", "shop/2.0");

            let cfg = ToyyibPayConfig::load(Some(Path::new("toyyibpay.yaml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.timeout, Duration::from_secs(90));
            assert_eq!(cfg.development_url, "https://staging.example.com");
            assert_eq!(cfg.production_url, PRODUCTION_URL);
            assert_eq!(cfg.user_agent, "shop/2.0");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_flags() {
        Jail::expect_with(|jail| {
            jail.set_env("TOYYIBPAY_ALLOW_INSECURE_HTTP", "true");
            jail.set_env("TOYYIBPAY_TIMEOUT", "5s");

            let cfg = ToyyibPayConfig::load(None).map_err(|e| e.to_string())?;
            assert!(cfg.allow_insecure_http);
            assert_eq!(cfg.timeout, Duration::from_secs(5));
            Ok(())
        });
    }

    #[test]
    fn transport_settings_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("TOYYIBPAY_TLS_ROOTS", "native");
            jail.set_env("TOYYIBPAY_MAX_BODY_SIZE", "4096");
            jail.set_env("TOYYIBPAY_POOL_IDLE_TIMEOUT", "15s");
            jail.set_env("TOYYIBPAY_POOL_MAX_IDLE_PER_HOST", "0");

            let cfg = ToyyibPayConfig::load(None).map_err(|e| e.to_string())?;
            assert_eq!(cfg.tls_roots, TlsRootConfig::Native);
            assert_eq!(cfg.max_body_size, 4096);
            assert_eq!(cfg.pool_idle_timeout, Duration::from_secs(15));
            assert_eq!(cfg.pool_max_idle_per_host, 0);
            Ok(())
        });
    }

    #[test]
    fn http_config_carries_every_transport_setting() {
        let cfg = ToyyibPayConfig {
            timeout: Duration::from_secs(7),
            user_agent: "shop/3.0".to_owned(),
            allow_insecure_http: true,
            tls_roots: TlsRootConfig::Native,
            max_body_size: 2048,
            pool_idle_timeout: Duration::from_secs(20),
            pool_max_idle_per_host: 1,
            ..ToyyibPayConfig::default()
        };

        let http = cfg.http_config();
        assert_eq!(http.request_timeout, Duration::from_secs(7));
        assert_eq!(http.user_agent, "shop/3.0");
        assert_eq!(http.transport, TransportSecurity::AllowInsecureHttp);
        assert_eq!(http.tls_roots, TlsRootConfig::Native);
        assert_eq!(http.max_body_size, 2048);
        assert_eq!(
            http.pool,
            PoolConfig {
                idle_timeout: Some(Duration::from_secs(20)),
                max_idle_per_host: 1,
            }
        );
    }

    #[test]
    fn default_http_config_is_tls_only() {
        let http = ToyyibPayConfig::default().http_config();
        assert_eq!(http.transport, TransportSecurity::TlsOnly);
        assert_eq!(http.tls_roots, TlsRootConfig::WebPki);
        assert_eq!(http.pool, PoolConfig::default());
    }

    #[test]
    fn bad_duration_is_load_error() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "timeout": "soon"
        })));
        let err = ToyyibPayConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)), "{err:?}");
    }

    #[test]
    fn unknown_key_rejected() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "prodution_url": "https://typo.example.com"
        })));
        assert!(ToyyibPayConfig::from_figment(&figment).is_err());
    }

    #[test]
    fn timeout_serializes_as_humantime() {
        let value = serde_json::to_value(ToyyibPayConfig::default()).unwrap();
        assert_eq!(value["timeout"], "30s");
    }
}
