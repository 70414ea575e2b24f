//! CLI configuration: thin wrapper around `merakidns_config`.
//!
//! Adds the `GlobalOpts`-aware layer: flag overrides (--base-url,
//! --api-key, --insecure, --timeout), output settings, and default
//! organization/network fragments from the active profile.

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use merakidns_core::DashboardConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Status};

// ── Re-exports from shared crate ────────────────────────────────────

pub use merakidns_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Everything a dashboard-bound command needs from flags + config file.
pub struct Context {
    pub profile_name: String,
    pub profile: Profile,
    pub output: OutputFormat,
    pub status: Status,
    pub yes: bool,
    timeout: Duration,
    api_key_flag: Option<String>,
    base_url_flag: Option<String>,
    insecure: bool,
}

impl Context {
    /// Load the config file and merge it with the global flags.
    ///
    /// A missing file is fine (public dashboard, key from flag/env). A
    /// profile named explicitly with `--profile` must exist.
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = load_config_or_default();
        let profile_name = active_profile_name(global, &cfg);

        let profile = match cfg.profiles.get(&profile_name) {
            Some(p) => p.clone(),
            None if global.profile.is_some() => {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(&cfg),
                });
            }
            None => Profile::default(),
        };

        let output = global.output.unwrap_or_else(|| {
            OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Table)
        });
        let color = global.color.unwrap_or_else(|| {
            ColorMode::from_str(&cfg.defaults.color, true).unwrap_or(ColorMode::Auto)
        });
        let timeout = global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout);

        Ok(Self {
            profile_name,
            profile,
            output,
            status: Status {
                color: output::should_color(color),
                quiet: global.quiet,
            },
            yes: global.yes,
            timeout: Duration::from_secs(timeout),
            api_key_flag: global.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url_flag: global.base_url.clone(),
            insecure: global.insecure,
        })
    }

    pub fn quiet(&self) -> bool {
        self.status.quiet
    }

    /// API key: flag / `MERAKI_DASHBOARD_API_KEY`, then the profile chain.
    pub fn api_key(&self) -> Result<SecretString, CliError> {
        if let Some(ref key) = self.api_key_flag {
            return Ok(SecretString::from(key.clone()));
        }
        Ok(merakidns_config::resolve_api_key(
            &self.profile,
            &self.profile_name,
        )?)
    }

    /// Translate profile + flags into a `DashboardConfig` using `api_key`.
    ///
    /// This is the single boundary where CLI config types cross into core.
    pub fn dashboard_config(&self, api_key: SecretString) -> Result<DashboardConfig, CliError> {
        let raw = self
            .base_url_flag
            .as_deref()
            .unwrap_or(&self.profile.base_url);
        Ok(DashboardConfig {
            base_url: merakidns_config::parse_base_url(raw)?,
            api_key,
            tls: merakidns_config::tls_verification(&self.profile, self.insecure),
            timeout: self.timeout,
        })
    }

    /// Organization fragment: flag, else the profile's default.
    pub fn organization(&self, flag: Option<&str>) -> Result<String, CliError> {
        pick_fragment(flag, self.profile.organization.as_deref(), "organization", "--org")
    }

    /// Network fragment: flag, else the profile's default.
    pub fn network(&self, flag: Option<&str>) -> Result<String, CliError> {
        pick_fragment(flag, self.profile.network.as_deref(), "network", "--network")
    }
}

fn pick_fragment(
    flag: Option<&str>,
    fallback: Option<&str>,
    what: &str,
    flag_name: &str,
) -> Result<String, CliError> {
    flag.or(fallback)
        .map(str::to_owned)
        .ok_or_else(|| CliError::Validation {
            field: flag_name.into(),
            reason: format!(
                "no {what} given; pass {flag_name} or set `{what}` on the profile"
            ),
        })
}
