//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text, the stage of the run that failed, and a process exit code.

use miette::Diagnostic;
use strum::Display;
use thiserror::Error;

use merakidns_config::ConfigError;
use merakidns_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const DEVICE_UPDATE: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

/// The step of a run that failed, reported alongside the diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(to_string = "authentication")]
    Auth,
    #[strum(to_string = "organization lookup")]
    OrganizationLookup,
    #[strum(to_string = "network lookup")]
    NetworkLookup,
    #[strum(to_string = "device lookup")]
    DeviceLookup,
    #[strum(to_string = "input validation")]
    Validation,
    #[strum(to_string = "device update")]
    DeviceUpdate,
    #[strum(to_string = "configuration")]
    Config,
    #[strum(to_string = "connection")]
    Connection,
    #[strum(to_string = "dashboard request")]
    Dashboard,
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the dashboard at {url}")]
    #[diagnostic(
        code(merakidns::connection_failed),
        help(
            "{reason}\n\
             Behind a TLS-inspecting proxy? Set ca_cert in your profile or pass --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Dashboard request timed out")]
    #[diagnostic(
        code(merakidns::timeout),
        help("Increase the timeout with --timeout or check your connectivity.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("The dashboard rejected the API key")]
    #[diagnostic(
        code(merakidns::auth_failed),
        help(
            "Check the key under Organization > Settings > Dashboard API access.\n\
             Store a new one with: merakidns config set-key --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No API key configured for profile '{profile}'")]
    #[diagnostic(
        code(merakidns::no_credentials),
        help(
            "Pass --api-key, set MERAKI_DASHBOARD_API_KEY, or run: merakidns config init"
        )
    )]
    NoCredentials { profile: String },

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("No {resource_type} matches '{identifier}'")]
    #[diagnostic(
        code(merakidns::not_found),
        help("Run: merakidns {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(merakidns::validation))]
    Validation { field: String, reason: String },

    // ── Device updates ───────────────────────────────────────────────
    #[error("Device {serial} was not updated")]
    #[diagnostic(code(merakidns::device_update), help("{reason}"))]
    DeviceUpdate { serial: String, reason: String },

    #[error("DNS update stopped at device {serial}: {reason}")]
    #[diagnostic(
        code(merakidns::bulk_aborted),
        help(
            "Already updated ({updated_count}): {updated}\n\
             Not attempted ({pending_count}): {pending}\n\
             Re-running the same command is safe: updated devices are simply written again."
        )
    )]
    BulkAborted {
        serial: String,
        reason: String,
        updated: String,
        updated_count: usize,
        pending: String,
        pending_count: usize,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Dashboard API error ({status}): {message}")]
    #[diagnostic(code(merakidns::api_error))]
    ApiError { status: String, message: String },

    #[error("Rate limited by the dashboard")]
    #[diagnostic(
        code(merakidns::rate_limited),
        help("Retry in {retry_after_secs}s.")
    )]
    RateLimited { retry_after_secs: u64 },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(merakidns::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: merakidns config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(merakidns::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(merakidns::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(merakidns::internal))]
    Internal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::DeviceUpdate { .. } | Self::BulkAborted { .. } => exit_code::DEVICE_UPDATE,
            _ => exit_code::GENERAL,
        }
    }

    /// Fill in the active profile on auth failures converted without one.
    #[must_use]
    pub fn with_profile(self, profile_name: &str) -> Self {
        match self {
            Self::AuthFailed { profile } if profile.is_empty() => Self::AuthFailed {
                profile: profile_name.into(),
            },
            other => other,
        }
    }

    /// The step of the run this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => Stage::Connection,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => Stage::Auth,
            Self::NotFound { resource_type, .. } => match resource_type.as_str() {
                "organization" => Stage::OrganizationLookup,
                "network" => Stage::NetworkLookup,
                _ => Stage::DeviceLookup,
            },
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => Stage::Validation,
            Self::DeviceUpdate { .. } | Self::BulkAborted { .. } => Stage::DeviceUpdate,
            Self::ProfileNotFound { .. } | Self::Config { .. } | Self::Io(_) => Stage::Config,
            Self::ApiError { .. } | Self::RateLimited { .. } | Self::Internal { .. } => {
                Stage::Dashboard
            }
        }
    }
}

fn serial_list(serials: &[String]) -> String {
    if serials.is_empty() {
        "none".into()
    } else {
        serials.join(", ")
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            // Named by `with_profile` once the command's context is known.
            CoreError::AuthenticationFailed { message: _ } => CliError::AuthFailed {
                profile: String::new(),
            },

            CoreError::OrganizationNotFound { fragment } => CliError::NotFound {
                resource_type: "organization".into(),
                identifier: fragment,
                list_command: "orgs list".into(),
            },

            CoreError::NetworkNotFound { fragment } => CliError::NotFound {
                resource_type: "network".into(),
                identifier: fragment,
                list_command: "networks list --org <org>".into(),
            },

            CoreError::ValidationFailed { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::MissingUplink { serial } => CliError::DeviceUpdate {
                serial,
                reason: "It has no primary uplink (wan1) configuration.".into(),
            },

            CoreError::DeviceNotStatic { serial } => CliError::DeviceUpdate {
                serial,
                reason: "Its WAN1 uses DHCP; only static-IP devices get DNS changes.".into(),
            },

            CoreError::BulkAborted {
                serial,
                updated,
                pending,
                source,
            } => CliError::BulkAborted {
                serial,
                reason: source.to_string(),
                updated_count: updated.len(),
                updated: serial_list(&updated),
                pending_count: pending.len(),
                pending: serial_list(&pending),
            },

            CoreError::Remote { message, status } => CliError::ApiError {
                status: status.map_or_else(|| "no status".into(), |s| s.to_string()),
                message,
            },

            CoreError::RateLimited { retry_after_secs } => CliError::RateLimited { retry_after_secs },

            e @ CoreError::InvalidTransition { .. } => CliError::Internal {
                message: e.to_string(),
            },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
