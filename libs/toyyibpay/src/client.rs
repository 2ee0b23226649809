use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use toyyibpay_http::{HttpClient, HttpClientBuilder, HttpError};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ToyyibPayConfig;
use crate::error::{ConfigError, GatewayError};
use crate::models::{annotate_bank_status, describe_first_status};
use crate::operation::{Environment, Method, Operation};
use crate::options::{
    AllUserInfoOptions, BankFpxOptions, CreateUserOptions, EnvironmentOption, ListOptions,
    UserStatusOptions,
};

/// Path every endpoint lives under.
const API_PATH: &str = "/index.php/api";

/// `toyyibPay` gateway client.
///
/// One method per remote endpoint. Each call is a single round trip; the
/// client keeps no state between calls. Cloning is cheap and clones share
/// the connection pool.
///
/// # Example
///
/// ```ignore
/// use toyyibpay::{BankFpxOptions, ToyyibPayClient};
///
/// let client = ToyyibPayClient::new()?;
/// let banks = client
///     .get_bank_fpx(&BankFpxOptions { dev: true, with_status: true })
///     .await?;
/// ```
#[derive(Clone)]
pub struct ToyyibPayClient {
    http: HttpClient,
    production_api: String,
    development_api: String,
}

impl fmt::Debug for ToyyibPayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToyyibPayClient")
            .field("production_api", &self.production_api)
            .field("development_api", &self.development_api)
            .finish_non_exhaustive()
    }
}

impl ToyyibPayClient {
    /// Client for the public hosts with default transport settings.
    ///
    /// # Errors
    /// Returns `ConfigError::Http` if the TLS stack cannot be initialized.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(&ToyyibPayConfig::default())
    }

    /// Build the transport and the client from one configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if a base URL is unusable, the user agent is
    /// not a valid header value or TLS setup fails.
    pub fn from_config(config: &ToyyibPayConfig) -> Result<Self, ConfigError> {
        let http = HttpClientBuilder::with_config(config.http_config()).build()?;
        Self::with_http_client(http, config)
    }

    /// Use an existing transport; only the base URLs are taken from `config`.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBaseUrl` if a base URL is not an
    /// absolute `http(s)` URL, or is plain `http` while
    /// `allow_insecure_http` is off.
    pub fn with_http_client(
        http: HttpClient,
        config: &ToyyibPayConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            http,
            production_api: api_root(&config.production_url, config.allow_insecure_http)?,
            development_api: api_root(&config.development_url, config.allow_insecure_http)?,
        })
    }

    /// Full URL of an operation's endpoint in the given environment.
    #[must_use]
    pub fn endpoint_url(&self, operation: Operation, environment: Environment) -> String {
        let root = match environment {
            Environment::Production => &self.production_api,
            Environment::Development => &self.development_api,
        };
        format!("{root}/{}", operation.endpoint())
    }

    /// List the banks accepted for account registration.
    ///
    /// # Errors
    /// Returns `GatewayError` if the request fails or the gateway answers
    /// with a non-2xx status.
    #[instrument(skip(self, options), fields(dev = options.dev))]
    pub async fn get_bank(&self, options: &ListOptions) -> Result<Value, GatewayError> {
        let body = self.get(Operation::GetBank, options).await?;
        Ok(passthrough(&body))
    }

    /// List FPX banks, optionally annotated with online status.
    ///
    /// Without `with_status` the body is returned exactly as received. With
    /// it, every bank object gains `STATUS` and `IS_ONLINE`; a body that is
    /// not a list is still returned unchanged.
    ///
    /// # Errors
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self, options), fields(dev = options.dev, with_status = options.with_status))]
    pub async fn get_bank_fpx(&self, options: &BankFpxOptions) -> Result<Value, GatewayError> {
        let body = self.get(Operation::GetBankFpx, options).await?;
        let mut banks = passthrough(&body);

        if options.with_status {
            match annotate_bank_status(&mut banks) {
                Some(offline) => debug!(offline, "annotated bank status"),
                None => debug!("body is not a bank list; returned unchanged"),
            }
        }
        Ok(banks)
    }

    /// List the packages a new account can subscribe to.
    ///
    /// # Errors
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self, options), fields(dev = options.dev))]
    pub async fn get_package(&self, options: &ListOptions) -> Result<Value, GatewayError> {
        let body = self.get(Operation::GetPackage, options).await?;
        Ok(passthrough(&body))
    }

    /// Register a user under an enterprise account.
    ///
    /// # Errors
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self, options), fields(dev = options.dev, username = %options.username))]
    pub async fn create_user(&self, options: &CreateUserOptions) -> Result<Value, GatewayError> {
        let body = self.post(Operation::CreateUser, options).await?;
        Ok(passthrough(&body))
    }

    /// Look one user up by username.
    ///
    /// When the body is a non-empty list, the first record gets a
    /// `description` for its status code. Anything else is returned as
    /// received.
    ///
    /// # Errors
    /// Returns `GatewayError` if the request fails.
    #[instrument(skip(self, options), fields(dev = options.dev, username = %options.username))]
    pub async fn get_user_status(
        &self,
        options: &UserStatusOptions,
    ) -> Result<Value, GatewayError> {
        let body = self.post(Operation::GetUserStatus, options).await?;
        let mut records = passthrough(&body);
        let status = describe_first_status(&mut records);
        debug!(?status, "described first record");
        Ok(records)
    }

    /// List every user under a partner account.
    ///
    /// # Errors
    /// Returns `GatewayError` if the request fails.
    #[instrument(
        skip(self, options),
        fields(dev = options.dev, partner_type = %options.partner_type)
    )]
    pub async fn get_all_user_info(
        &self,
        options: &AllUserInfoOptions,
    ) -> Result<Value, GatewayError> {
        let body = self.post(Operation::GetAllUserInfo, options).await?;
        Ok(passthrough(&body))
    }

    async fn get<O>(&self, op: Operation, options: &O) -> Result<Bytes, GatewayError>
    where
        O: EnvironmentOption,
    {
        debug_assert_eq!(op.method(), Method::Get);
        let url = self.endpoint_url(op, options.environment());
        debug!(%url, "dispatching request");

        let result = async { self.http.get(&url).send().await?.checked_bytes().await }.await;
        finish(op, result)
    }

    async fn post<O>(&self, op: Operation, options: &O) -> Result<Bytes, GatewayError>
    where
        O: EnvironmentOption + Serialize,
    {
        debug_assert_eq!(op.method(), Method::Post);
        let url = self.endpoint_url(op, options.environment());
        debug!(%url, "dispatching request");

        let result = async {
            self.http
                .post(&url)
                .json(options)?
                .send()
                .await?
                .checked_bytes()
                .await
        }
        .await;
        finish(op, result)
    }
}

fn finish(op: Operation, result: Result<Bytes, HttpError>) -> Result<Bytes, GatewayError> {
    match result {
        Ok(body) => {
            debug!(endpoint = op.endpoint(), bytes = body.len(), "request succeeded");
            Ok(body)
        }
        Err(e) => {
            let err = GatewayError::new(op, e);
            warn!(endpoint = op.endpoint(), error = %err, "gateway call failed");
            Err(err)
        }
    }
}

/// The body as JSON, or as a JSON string if the gateway sent bare text.
fn passthrough(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// `<base>/index.php/api`, after checking the base is a usable URL.
fn api_root(base: &str, allow_insecure_http: bool) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: base.to_owned(),
        reason,
    };

    let parsed = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "https" => {}
        "http" => {
            if !allow_insecure_http {
                return Err(invalid("plain http requires allow_insecure_http".to_owned()));
            }
        }
        other => return Err(invalid(format!("unsupported scheme '{other}'"))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_owned()));
    }

    Ok(format!("{}{API_PATH}", base.trim_end_matches('/')))
}
