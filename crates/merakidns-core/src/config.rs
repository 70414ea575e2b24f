// ── Runtime connection configuration ──
//
// These types describe *how* to reach the Dashboard API. They carry the
// credential and connection tuning, but never touch disk. The CLI builds
// a `DashboardConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use merakidns_api::transport::{TlsMode, TransportConfig};
use merakidns_api::{DEFAULT_BASE_URL, DashboardClient};

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). The public dashboard has valid certificates.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (TLS-inspecting proxies).
    CustomCa(PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for one dashboard session.
///
/// Built by the CLI, passed to [`Session::open`](crate::Session::open).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base URL (e.g., `https://api.meraki.com/api/v1`).
    pub base_url: Url,
    /// Dashboard API key.
    pub api_key: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl DashboardConfig {
    /// Config for the public dashboard with default transport settings.
    pub fn new(api_key: SecretString) -> Result<Self, CoreError> {
        let base_url = DEFAULT_BASE_URL.parse().map_err(|e| CoreError::Config {
            message: format!("invalid default base URL: {e}"),
        })?;
        Ok(Self {
            base_url,
            api_key,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        })
    }

    /// Build the HTTP client described by this config. Makes no request.
    pub fn build_client(&self) -> Result<DashboardClient, CoreError> {
        let transport = TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
        };
        Ok(DashboardClient::from_api_key(
            self.base_url.as_str(),
            &self.api_key,
            &transport,
        )?)
    }
}
