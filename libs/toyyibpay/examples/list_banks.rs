//! Print the sandbox bank lists.
//!
//! ```text
//! RUST_LOG=toyyibpay=debug cargo run -p toyyibpay --example list_banks
//! ```
//!
//! Reads `toyyibpay.yaml` from the working directory if present, and
//! `TOYYIBPAY_*` environment overrides.

use std::path::Path;

use anyhow::Context;
use toyyibpay::{BankFpxOptions, ListOptions, ToyyibPayClient, ToyyibPayConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let path = Path::new("toyyibpay.yaml");
    let config = ToyyibPayConfig::load(path.exists().then_some(path))
        .context("loading toyyibPay configuration")?;
    let client = ToyyibPayClient::from_config(&config)?;

    let banks = client.get_bank(&ListOptions::dev()).await?;
    println!("{}", serde_json::to_string_pretty(&banks)?);

    let fpx = client
        .get_bank_fpx(&BankFpxOptions {
            dev: true,
            with_status: true,
        })
        .await?;
    for bank in fpx.as_array().into_iter().flatten() {
        println!(
            "{:<12} {:<40} {}",
            bank["CODE"].as_str().unwrap_or("-"),
            bank["NAME"].as_str().unwrap_or("-"),
            bank["STATUS"].as_str().unwrap_or("-"),
        );
    }

    Ok(())
}
