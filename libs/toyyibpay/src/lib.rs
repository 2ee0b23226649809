#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Client for the `toyyibPay` payment gateway
//!
//! Covers bank and package listings, FPX bank availability and enterprise
//! account management. Each method performs one HTTP round trip against the
//! production host, or the sandbox host when the options bag sets `dev`.
//!
//! Responses come back as the gateway sent them, with two enrichments:
//! - `get_bank_fpx` with `with_status` adds `STATUS` and `IS_ONLINE` to
//!   every bank, derived from the `(Offline)` marker in its name
//! - `get_user_status` adds a `description` to the first record
//!
//! Failures are reported as [`GatewayError`], which renders as
//! `Error: Unable to <action> (<message>)`.
//!
//! # Example
//!
//! ```ignore
//! use toyyibpay::{ListOptions, ToyyibPayClient};
//!
//! let client = ToyyibPayClient::new()?;
//! let banks = client.get_bank(&ListOptions::dev()).await?;
//! println!("{banks}");
//! ```

mod client;
pub mod config;
mod error;
pub mod models;
mod operation;
pub mod options;

pub use client::ToyyibPayClient;
pub use config::ToyyibPayConfig;
pub use error::{ConfigError, GatewayError};
pub use models::{AccountStatus, BankStatus};
pub use operation::{Environment, Method, Operation};
pub use options::{
    AllUserInfoOptions, BankFpxOptions, CreateUserOptions, ListOptions, UserStatusOptions,
};
pub use toyyibpay_http::{HttpClient, HttpClientBuilder, HttpError, TlsRootConfig};
