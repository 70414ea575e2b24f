use thiserror::Error;

/// Top-level error type for the `merakidns-api` crate.
///
/// Covers every failure mode of the Dashboard API surface:
/// authentication, transport, API status errors, and payload decoding.
/// `merakidns-core` maps these into its own error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API key rejected by the dashboard (HTTP 401), or empty.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// The key is valid but lacks access to the requested resource (HTTP 403).
    #[error("Access denied: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Dashboard ───────────────────────────────────────────────────
    /// Rate limited by the dashboard. Includes retry-after in seconds.
    #[error("Rate limited -- retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success response. `message` joins the `errors` array
    /// of the response body when one is present.
    #[error("Dashboard API error (HTTP {status}): {message}")]
    Dashboard { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the dashboard rejected the credential itself.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidApiKey)
    }

    /// Returns `true` if this is a transient error a caller could retry.
    ///
    /// Nothing in this workspace retries; the flag only shapes diagnostics.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Dashboard { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Dashboard { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidApiKey => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::RateLimited { .. } => Some(429),
            Self::Dashboard { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
