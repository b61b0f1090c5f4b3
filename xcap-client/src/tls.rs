use std::sync::{Arc, OnceLock};

use hyper_rustls::ConfigBuilderExt;
use rustls::ClientConfig;

use crate::error::ClientError;

/// Decides which server certificates are trusted, by building the rustls
/// configuration used to reach a given host.
pub trait CertificateVerifier: Send + Sync {
    fn client_config(&self, host: &str) -> Result<Arc<ClientConfig>, ClientError>;
}

/// Trust the root certificates of the platform
#[derive(Default)]
pub struct NativeRootsVerifier {
    config: OnceLock<Arc<ClientConfig>>,
}

impl CertificateVerifier for NativeRootsVerifier {
    fn client_config(&self, _host: &str) -> Result<Arc<ClientConfig>, ClientError> {
        if let Some(config) = self.config.get() {
            return Ok(config.clone());
        }

        let config = ClientConfig::builder()
            .with_native_roots()
            .map_err(|e| ClientError::io("unable to load the native root certificates", e))?
            .with_no_client_auth();
        tracing::debug!("native root certificates loaded");

        Ok(self.config.get_or_init(|| Arc::new(config)).clone())
    }
}
