//! DNS command handlers: offline address checks, bulk and single-device updates.

use serde::Serialize;
use tabled::Tabled;

use merakidns_core::{BulkReport, DnsUpdate, UplinkConfig, is_valid_ipv4, set_device_dns};

use crate::cli::{DnsArgs, DnsCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Address check ───────────────────────────────────────────────────

#[derive(Serialize)]
struct AddressCheck {
    address: String,
    valid: bool,
}

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Valid")]
    valid: &'static str,
}

impl From<&AddressCheck> for AddressRow {
    fn from(c: &AddressCheck) -> Self {
        Self {
            address: c.address.clone(),
            valid: if c.valid { "yes" } else { "no" },
        }
    }
}

// ── Bulk plan / report ──────────────────────────────────────────────

/// What `dns set` would do (dry run) or is about to do.
#[derive(Serialize)]
struct Plan<'a> {
    organization: &'a str,
    network: &'a str,
    dns: DnsUpdate,
    devices: &'a [String],
}

fn plan_detail(p: &Plan<'_>) -> String {
    let devices = if p.devices.is_empty() {
        "(none)".to_owned()
    } else {
        p.devices.join(", ")
    };
    [
        format!("Organization: {}", p.organization),
        format!("Network:      {}", p.network),
        format!("DNS:          {}", p.dns),
        format!("Devices:      {devices}"),
    ]
    .join("\n")
}

fn report_detail(r: &BulkReport) -> String {
    [
        format!("Network: {}", r.network_id),
        format!("DNS:     {}", r.dns),
        format!("Updated: {}", r.updated.join(", ")),
    ]
    .join("\n")
}

fn uplink_detail(serial: &str, wan1: &UplinkConfig) -> String {
    let dns = wan1.static_dns();
    [
        format!("Serial:        {serial}"),
        format!("Static IP:     {}", wan1.static_ip().unwrap_or("-")),
        format!("Primary DNS:   {}", dns.primary.as_deref().unwrap_or("-")),
        format!("Secondary DNS: {}", dns.secondary.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DnsArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        DnsCommand::Check { addresses } => {
            let checks: Vec<AddressCheck> = addresses
                .into_iter()
                .map(|address| AddressCheck {
                    valid: is_valid_ipv4(&address),
                    address,
                })
                .collect();

            let out = output::render_list(ctx.output, &checks, |x| AddressRow::from(x), |c| {
                format!("{}\t{}", c.address, if c.valid { "valid" } else { "invalid" })
            });
            output::print_output(&out, ctx.quiet());

            let invalid: Vec<&str> = checks
                .iter()
                .filter(|c| !c.valid)
                .map(|c| c.address.as_str())
                .collect();
            if invalid.is_empty() {
                Ok(())
            } else {
                Err(CliError::Validation {
                    field: "DNS address".into(),
                    reason: format!("not a dotted-quad IPv4 address: {}", invalid.join(", ")),
                })
            }
        }

        DnsCommand::Set {
            target,
            servers,
            dry_run,
        } => {
            // Input is checked before any dashboard call.
            let update = util::dns_update(&servers)?;
            let org = ctx.organization(target.org.as_deref())?;
            let net = ctx.network(target.network.as_deref())?;

            let session = util::connect(ctx)
                .await?
                .select_organization(&org)
                .await?
                .select_network(&net)
                .await?;
            let org_name = session.organization().map(|o| o.name.clone()).unwrap_or_default();
            let net_name = session.network().map(|n| n.name.clone()).unwrap_or_default();

            let devices = session.static_devices().await?;
            let plan = Plan {
                organization: &org_name,
                network: &net_name,
                dns: update,
                devices: &devices,
            };

            if dry_run {
                ctx.status
                    .info(&format!("Dry run: {} device(s) would change", devices.len()));
                let out = output::render_single(ctx.output, &plan, plan_detail, |p| {
                    p.devices.join("\n")
                });
                output::print_output(&out, ctx.quiet());
                return Ok(());
            }

            if devices.is_empty() {
                ctx.status
                    .warn(&format!("No static-IP devices in {net_name}; nothing to do"));
                return Ok(());
            }

            ctx.status.info(&plan_detail(&plan));
            let prompt = format!("Update DNS on {} device(s) in {net_name}?", devices.len());
            if !util::confirm(&prompt, ctx.yes)? {
                ctx.status.warn("Aborted; no device was changed");
                return Ok(());
            }

            let bar = util::bulk_progress(ctx.quiet());
            let outcome = session
                .apply_dns_to_with(&devices, &update, util::track(&bar))
                .await;
            bar.finish_and_clear();
            let (_, report) = outcome?;

            ctx.status.success(&format!(
                "Updated {} device(s) in {net_name}",
                report.updated.len()
            ));
            let out = output::render_single(ctx.output, &report, report_detail, |r| {
                r.updated.join("\n")
            });
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        DnsCommand::SetDevice { serial, servers } => {
            let update = util::dns_update(&servers)?;
            let session = util::connect(ctx).await?;

            if !util::confirm(&format!("Update DNS on {serial} ({update})?"), ctx.yes)? {
                ctx.status.warn("Aborted; no device was changed");
                return Ok(());
            }

            let wan1 = set_device_dns(session.dashboard(), &serial, &update).await?;
            ctx.status.success(&format!("Updated {serial}"));
            let out = output::render_single(
                ctx.output,
                &wan1,
                |w| uplink_detail(&serial, w),
                |_| serial.clone(),
            );
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
