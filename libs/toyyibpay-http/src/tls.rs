//! rustls setup for the HTTPS connector.

use std::sync::{Arc, OnceLock};

use hyper_rustls::builderstates::WantsSchemes;
use hyper_rustls::{ConfigBuilderExt as _, HttpsConnectorBuilder};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, RootCertStore};

use crate::config::TlsRootConfig;
use crate::error::HttpError;

/// OS roots, read once per process. `None` if nothing usable was found.
static NATIVE_ROOTS: OnceLock<Option<Arc<RootCertStore>>> = OnceLock::new();

/// The process-wide provider if one is installed, else aws-lc-rs.
fn provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn load_native_roots() -> Option<Arc<RootCertStore>> {
    let loaded = rustls_native_certs::load_native_certs();
    for err in &loaded.errors {
        tracing::warn!(error = %err, "skipping unreadable native root certificate");
    }

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(loaded.certs);
    if ignored > 0 {
        tracing::warn!(added, ignored, "some native root certificates did not parse");
    }
    if added == 0 {
        tracing::warn!("OS certificate store has no usable root certificates");
        return None;
    }

    tracing::debug!(added, "loaded native root certificates");
    Some(Arc::new(store))
}

pub(crate) fn native_roots() -> Option<Arc<RootCertStore>> {
    NATIVE_ROOTS.get_or_init(load_native_roots).clone()
}

fn client_config(roots: TlsRootConfig) -> Result<ClientConfig, HttpError> {
    let builder = ClientConfig::builder_with_provider(provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    let config = match roots {
        TlsRootConfig::WebPki => builder.with_webpki_roots(),
        TlsRootConfig::Native => {
            let store = native_roots().ok_or_else(|| {
                HttpError::Tls("no native root CA certificates in the OS store".into())
            })?;
            builder.with_root_certificates(store)
        }
    };
    Ok(config.with_no_client_auth())
}

/// Connector builder with the chosen roots, ready for scheme selection.
///
/// # Errors
/// Returns `HttpError::Tls` if the provider rejects the protocol versions or
/// `Native` roots are requested but the OS store is empty.
pub(crate) fn connector_builder(
    roots: TlsRootConfig,
) -> Result<HttpsConnectorBuilder<WantsSchemes>, HttpError> {
    Ok(HttpsConnectorBuilder::new().with_tls_config(client_config(roots)?))
}
