// ── Core error types ──
//
// User-facing errors from merakidns-core. Consumers never see raw HTTP
// plumbing: the `From<merakidns_api::Error>` impl folds transport-layer
// failures into the auth / remote / connection families.

use thiserror::Error;

use crate::session::SessionStage;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Credential & connection errors ───────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cannot reach the dashboard at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Dashboard request timed out")]
    Timeout,

    // ── Resolution errors ────────────────────────────────────────────
    #[error("No organization name contains '{fragment}'")]
    OrganizationNotFound { fragment: String },

    #[error("No network name contains '{fragment}'")]
    NetworkNotFound { fragment: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device {serial} has no primary uplink (wan1) configuration")]
    MissingUplink { serial: String },

    #[error("Device {serial} does not use static addressing on wan1")]
    DeviceNotStatic { serial: String },

    #[error("DNS update aborted at device {serial} ({} updated, {} not attempted): {source}", .updated.len(), .pending.len())]
    BulkAborted {
        /// The device whose update failed.
        serial: String,
        /// Serials written successfully before the failure, in order.
        updated: Vec<String>,
        /// Serials never attempted, in listing order.
        pending: Vec<String>,
        #[source]
        source: Box<CoreError>,
    },

    // ── Remote API errors (wrapped, not exposed raw) ─────────────────
    #[error("Dashboard API error: {message}")]
    Remote {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Rate limited by the dashboard -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Cannot {action} while the session is in stage '{from}'")]
    InvalidTransition {
        from: SessionStage,
        action: &'static str,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for the remote-call family (anything the API or the
    /// network between us and it can fail with).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. }
                | Self::RateLimited { .. }
                | Self::Timeout
                | Self::ConnectionFailed { .. }
        )
    }

    /// Returns `true` if a name fragment matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::OrganizationNotFound { .. } | Self::NetworkNotFound { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<merakidns_api::Error> for CoreError {
    fn from(err: merakidns_api::Error) -> Self {
        match err {
            merakidns_api::Error::InvalidApiKey => CoreError::AuthenticationFailed {
                message: "Invalid API key".into(),
            },
            merakidns_api::Error::Forbidden { message } => CoreError::Remote {
                message,
                status: Some(403),
            },
            merakidns_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Remote {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            merakidns_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            merakidns_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            merakidns_api::Error::RateLimited { retry_after_secs } => {
                CoreError::RateLimited { retry_after_secs }
            }
            merakidns_api::Error::Dashboard { status, message } => CoreError::Remote {
                message,
                status: Some(status),
            },
            merakidns_api::Error::Deserialization { message, body: _ } => CoreError::Remote {
                message: format!("unexpected response payload: {message}"),
                status: None,
            },
        }
    }
}
