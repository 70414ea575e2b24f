//! Guided bulk update: key, organization, network, two DNS servers, apply.

use std::io::IsTerminal;

use dialoguer::{Input, Password, Select};
use secrecy::SecretString;
use tracing::debug;

use merakidns_core::{
    CoreError, DashboardClient, DnsUpdate, NetworkId, OrganizationId, Session, is_valid_ipv4,
};

use crate::config::Context;
use crate::error::CliError;

use super::util::{self, prompt_err};

/// Open a session, asking for the key until the dashboard accepts one.
///
/// A key from flags, env, or the profile is tried first.
async fn open_session(ctx: &Context) -> Result<Session<DashboardClient>, CliError> {
    let mut key = ctx.api_key().ok();
    loop {
        let api_key = match key.take() {
            Some(k) => k,
            None => {
                let raw = Password::new()
                    .with_prompt("Meraki Dashboard API key")
                    .interact()
                    .map_err(prompt_err)?;
                SecretString::from(raw.trim().to_owned())
            }
        };

        match Session::open(&ctx.dashboard_config(api_key)?).await {
            Ok(session) => return Ok(session),
            Err(CoreError::AuthenticationFailed { .. }) => {
                ctx.status
                    .warn("Your Meraki Dashboard API key is invalid, please retry");
            }
            Err(e) => return Err(util::with_profile(e, &ctx.profile_name)),
        }
    }
}

/// Let the operator pick one entry; returns the picked entry itself.
fn pick<'a, T>(
    prompt: &str,
    items: &'a [T],
    name: impl Fn(&T) -> &str,
) -> Result<&'a T, CliError> {
    let names: Vec<&str> = items.iter().map(name).collect();
    let index = Select::new()
        .with_prompt(prompt)
        .items(&names)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    items.get(index).ok_or_else(|| CliError::Internal {
        message: format!("selection {index} out of range"),
    })
}

fn dns_input(prompt: &str, rejection: &'static str) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(move |raw: &String| {
            if is_valid_ipv4(raw.trim()) {
                Ok(())
            } else {
                Err(rejection)
            }
        })
        .interact_text()
        .map(|raw| raw.trim().to_owned())
        .map_err(prompt_err)
}

pub async fn run(ctx: &Context) -> Result<(), CliError> {
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "interactive".into(),
            reason: "the wizard needs a terminal; use `merakidns dns set` for scripted runs"
                .into(),
        });
    }

    let session = open_session(ctx).await?;
    ctx.status.success("API key accepted");

    let orgs = session.organizations().await?;
    if orgs.is_empty() {
        ctx.status.warn("This API key has access to no organization");
        return Ok(());
    }
    // Selection goes by id: two names where one contains the other must not
    // collapse onto the later listing.
    let org = pick("Organization", &orgs, |o| o.name.as_str())?;
    let session = session
        .select_organization_by_id(&OrganizationId::new(org.id.as_str()))
        .await?;
    let org_name = session.organization().map(|o| o.name.clone()).unwrap_or_default();
    debug!(organization = ?session.organization_id(), "organization selected");

    let nets = session.networks().await?;
    if nets.is_empty() {
        ctx.status.warn(&format!("{org_name} has no network"));
        return Ok(());
    }
    let net = pick("Network", &nets, |n| n.name.as_str())?;
    let session = session
        .select_network_by_id(&NetworkId::new(net.id.as_str()))
        .await?;
    let net_name = session.network().map(|n| n.name.clone()).unwrap_or_default();
    debug!(network = ?session.network_id(), "network selected");

    let primary = dns_input("First DNS", "First DNS is not valid, please correct it")?;
    let secondary = dns_input("Second DNS", "Second DNS is not valid, please correct it")?;
    let update = DnsUpdate::new(Some(primary.as_str()), Some(secondary.as_str()))?;

    let devices = session.static_devices().await?;
    if devices.is_empty() {
        ctx.status
            .warn(&format!("No static-IP devices in {net_name}; nothing to do"));
        return Ok(());
    }
    let prompt = format!(
        "Set DNS {update} on {} device(s) in {net_name}?",
        devices.len()
    );
    if !util::confirm(&prompt, ctx.yes)? {
        ctx.status.warn("Aborted; no device was changed");
        return Ok(());
    }

    ctx.status.info("Work in progress...");
    let bar = util::bulk_progress(ctx.quiet());
    let outcome = session.apply_dns_to_with(&devices, &update, util::track(&bar)).await;
    bar.finish_and_clear();
    let (_, report) = outcome?;

    ctx.status.success(&format!(
        "Done! {} device(s) in {net_name} now use {}",
        report.updated.len(),
        report.dns
    ));
    Ok(())
}
