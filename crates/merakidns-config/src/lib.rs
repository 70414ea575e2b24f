//! Configuration for the merakidns CLI.
//!
//! TOML profiles, credential resolution (env var, OS keyring, plaintext),
//! and translation to `merakidns_core::DashboardConfig`. The CLI layers its
//! flag overrides on top of what this crate resolves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use merakidns_core::{DEFAULT_BASE_URL, DashboardConfig, TlsVerification};

/// Service name under which API keys are stored in the OS keyring.
pub const KEYRING_SERVICE: &str = "merakidns";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named dashboard profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named dashboard profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Dashboard API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default organization name fragment.
    pub organization: Option<String>,

    /// Default network name fragment.
    pub network: Option<String>,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,

    /// Path to a custom CA certificate (TLS-inspecting proxies).
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            organization: None,
            network: None,
            api_key: None,
            api_key_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "merakidns", "merakidns").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("merakidns");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path`, then `MERAKIDNS_*` env vars (`__` separates nesting,
/// e.g. `MERAKIDNS_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MERAKIDNS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/api-key"))
}

/// Resolve an API key from the credential chain (no CLI flag step).
pub fn resolve_api_key(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(ref env_name) = profile.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = profile.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store an API key for `profile_name` in the OS keyring.
pub fn store_api_key(profile_name: &str, key: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(key)?;
    Ok(())
}

// ── Translation to core ─────────────────────────────────────────────

/// Parse and check a dashboard base URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

/// TLS strategy for a profile. `force_insecure` wins over everything.
pub fn tls_verification(profile: &Profile, force_insecure: bool) -> TlsVerification {
    if force_insecure || profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `DashboardConfig` from a profile, no CLI flag overrides.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<DashboardConfig, ConfigError> {
    let base_url = parse_base_url(&profile.base_url)?;
    let api_key = resolve_api_key(profile, profile_name)?;

    Ok(DashboardConfig {
        base_url,
        api_key,
        tls: tls_verification(profile, false),
        timeout: Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout)),
    })
}
