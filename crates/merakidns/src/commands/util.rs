//! Shared helpers for command handlers.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use merakidns_core::{BulkProgress, CoreError, DashboardClient, DnsUpdate, Session};

use crate::cli::DnsServers;
use crate::config::Context;
use crate::error::CliError;

/// Open a session with the context's key, base URL, and TLS settings.
pub async fn connect(ctx: &Context) -> Result<Session<DashboardClient>, CliError> {
    let config = ctx.dashboard_config(ctx.api_key()?)?;
    debug!(base_url = %config.base_url, "connecting to dashboard");
    Session::open(&config)
        .await
        .map_err(|e| with_profile(e, &ctx.profile_name))
}

/// Like `CliError::from`, but names the profile in auth failures.
pub fn with_profile(err: CoreError, profile_name: &str) -> CliError {
    CliError::from(err).with_profile(profile_name)
}

/// Validate `--primary` / `--secondary` into a `DnsUpdate`.
pub fn dns_update(servers: &DnsServers) -> Result<DnsUpdate, CliError> {
    Ok(DnsUpdate::new(
        servers.primary.as_deref(),
        servers.secondary.as_deref(),
    )?)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Progress bar for a bulk run; hidden in quiet mode.
pub fn bulk_progress(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// Feed bulk progress events into `bar`.
pub fn track(bar: &ProgressBar) -> impl FnMut(BulkProgress<'_>) + Send + '_ {
    move |event: BulkProgress<'_>| match event {
        BulkProgress::Planned { serials } => {
            bar.set_length(u64::try_from(serials.len()).unwrap_or_default());
        }
        BulkProgress::Updating { serial, .. } => bar.set_message(format!("updating {serial}")),
        BulkProgress::Updated { .. } => bar.inc(1),
    }
}
