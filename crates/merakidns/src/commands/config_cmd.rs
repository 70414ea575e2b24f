//! Config subcommand handlers.

use dialoguer::{Input, Select};

use merakidns_core::DEFAULT_BASE_URL;

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output::{self, Status};

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the plaintext key.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "base_url = \"{}\"", p.base_url);
        if let Some(ref org) = p.organization {
            let _ = writeln!(out, "organization = \"{org}\"");
        }
        if let Some(ref net) = p.network {
            let _ = writeln!(out, "network = \"{net}\"");
        }
        if p.api_key.is_some() {
            let _ = writeln!(out, "api_key = \"****\"");
        }
        if let Some(ref env) = p.api_key_env {
            let _ = writeln!(out, "api_key_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

/// Structured formats get the same masking as the TOML view.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for p in cfg.profiles.values_mut() {
        if p.api_key.is_some() {
            p.api_key = Some("****".into());
        }
    }
    cfg
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn read_key(label: &str) -> Result<String, CliError> {
    let key = rpassword::prompt_password(label).map_err(prompt_err)?;
    let key = key.trim().to_owned();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(key)
}

/// Offer the keyring or the config file for the key.
///
/// Returns `Some(key)` for plaintext storage, `None` once it is in the keyring.
fn prompt_key_storage(
    key: String,
    profile_name: &str,
    status: Status,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the API key?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        merakidns_config::store_api_key(profile_name, &key)?;
        status.success("API key stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(key))
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse_flag<T: std::str::FromStr>(
    field: &str,
    value: &str,
    expected: &str,
) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" => {
            merakidns_config::parse_base_url(&value)?;
            profile.base_url = value;
        }
        "organization" | "org" => profile.organization = Some(value),
        "network" => profile.network = Some(value),
        "api_key" | "api-key" => profile.api_key = Some(value),
        "api_key_env" | "api-key-env" => profile.api_key_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(parse_flag("insecure", &value, "'true' or 'false'")?);
        }
        "timeout" => {
            profile.timeout = Some(parse_flag("timeout", &value, "a number (seconds)")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: base_url, organization, \
                     network, api_key, api_key_env, ca_cert, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let status = Status {
        color: output::should_color(global.color.unwrap_or(ColorMode::Auto)),
        quiet: global.quiet,
    };

    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_path();
            status.info(&format!("Config path: {}", path.display()));

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("Dashboard API base URL")
                .default(DEFAULT_BASE_URL.into())
                .validate_with(|raw: &String| {
                    merakidns_config::parse_base_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let key = read_key("API key: ")?;
            let api_key = prompt_key_storage(key, &profile_name, status)?;

            let organization: String = Input::new()
                .with_prompt("Default organization (name fragment, empty for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            let network: String = Input::new()
                .with_prompt("Default network (name fragment, empty for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    base_url,
                    organization: optional(&organization),
                    network: optional(&network),
                    api_key,
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            save_config(&cfg)?;

            status.success(&format!("Configuration written to {}", path.display()));
            status.info(&format!("Active profile: {profile_name}"));
            status.info("Test it: merakidns orgs list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = output::render_single(format, &cfg, format_config_redacted, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, value)?;

            save_config(&cfg)?;
            status.success(&format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── SetKey ──────────────────────────────────────────────────
        ConfigCommand::SetKey => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let key = read_key("API key: ")?;
            merakidns_config::store_api_key(&profile_name, &key)?;
            status.success(&format!(
                "API key stored in system keyring for profile '{profile_name}'"
            ));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                status.warn("No profiles configured. Run: merakidns config init");
            } else {
                let lines: Vec<String> = cfg
                    .profiles
                    .keys()
                    .map(|name| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}")
                    })
                    .collect();
                output::print_output(&lines.join("\n"), global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            status.success(&format!("Default profile set to '{name}'"));
            Ok(())
        }
    }
}
