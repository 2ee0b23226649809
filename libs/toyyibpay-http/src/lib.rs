#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the `toyyibPay` client
//!
//! A small hyper-based client tuned for talking to one JSON REST gateway:
//! - Automatic TLS via rustls (HTTPS only by default)
//! - Connection pooling
//! - A per-request timeout
//! - User-Agent header injection
//! - Transparent response decompression (gzip, brotli, deflate)
//! - Response body size limits applied to decompressed bytes
//!
//! Every request is a single round trip. There is no retry, redirect or
//! concurrency limiting layer.
//!
//! # Example
//!
//! ```ignore
//! use toyyibpay_http::HttpClient;
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .user_agent("my-shop/1.0")
//!     .build()?;
//!
//! let banks = client
//!     .get("https://toyyibpay.com/index.php/api/getBank")
//!     .send()
//!     .await?
//!     .checked_bytes()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod request;
mod response;
mod tls;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use config::{DEFAULT_USER_AGENT, HttpClientConfig, PoolConfig, TlsRootConfig, TransportSecurity};
pub use error::{BoxError, HttpError, InvalidUriKind};
pub use http::StatusCode;
pub use request::RequestBuilder;
pub use response::{HttpResponse, ResponseBody};
