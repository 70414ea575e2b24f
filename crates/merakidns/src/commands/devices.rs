//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use merakidns_core::{Dashboard, Device, device_in_network, device_in_organization};

use crate::cli::{DevicesArgs, DevicesCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "LAN IP")]
    lan_ip: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            serial: d.serial.clone(),
            name: d.name.clone().unwrap_or_default(),
            model: d.model.clone().unwrap_or_default(),
            mac: d.mac.clone().unwrap_or_default(),
            lan_ip: d.lan_ip.clone().unwrap_or_default(),
        }
    }
}

/// Outcome of `devices check`.
#[derive(Serialize)]
struct Membership {
    serial: String,
    organization: String,
    network: Option<String>,
}

fn detail(m: &Membership) -> String {
    let mut lines = vec![
        format!("Serial:       {}", m.serial),
        format!("Organization: {}", m.organization),
    ];
    if let Some(ref net) = m.network {
        lines.push(format!("Network:      {net}"));
    }
    lines.join("\n")
}

fn missing(what: &str) -> CliError {
    CliError::Internal {
        message: format!("{what} selected but no id recorded"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: DevicesArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List {
            target,
            static_only,
        } => {
            let org = ctx.organization(target.org.as_deref())?;
            let net = ctx.network(target.network.as_deref())?;
            let session = util::connect(ctx)
                .await?
                .select_organization(&org)
                .await?
                .select_network(&net)
                .await?;
            let network_id = session.network_id().ok_or_else(|| missing("network"))?;

            let mut devices = session.dashboard().devices(&network_id).await?;
            if static_only {
                let statics = session.static_devices().await?;
                devices.retain(|d| statics.contains(&d.serial));
            }

            let out = output::render_list(ctx.output, &devices, |x| DeviceRow::from(x), |d| {
                d.serial.clone()
            });
            output::print_output(&out, ctx.quiet());
            Ok(())
        }

        DevicesCommand::Check { serial, target } => {
            let org = ctx.organization(target.org.as_deref())?;
            let session = util::connect(ctx).await?.select_organization(&org).await?;
            let org_id = session.organization_id().ok_or_else(|| missing("organization"))?;
            let org_name = session
                .organization()
                .map(|o| o.name.clone())
                .unwrap_or_default();

            if !device_in_organization(session.dashboard(), &org_id, &serial).await? {
                return Err(CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: serial,
                    list_command: format!("devices list --org '{org_name}' --network <network>"),
                });
            }

            // Network membership is only checked when asked for explicitly.
            let mut network = None;
            if let Some(ref fragment) = target.network {
                let session = session.select_network(fragment).await?;
                let network_id = session.network_id().ok_or_else(|| missing("network"))?;
                let net_name = session.network().map(|n| n.name.clone()).unwrap_or_default();
                if !device_in_network(session.dashboard(), &network_id, &serial).await? {
                    return Err(CliError::NotFound {
                        resource_type: "device".into(),
                        identifier: format!("{serial} in network {net_name}"),
                        list_command: format!("devices list --org '{org_name}' --network '{net_name}'"),
                    });
                }
                network = Some(net_name);
            }

            ctx.status.success(&format!("{serial} belongs to {org_name}"));
            let membership = Membership {
                serial,
                organization: org_name,
                network,
            };
            let out = output::render_single(ctx.output, &membership, detail, |m| m.serial.clone());
            output::print_output(&out, ctx.quiet());
            Ok(())
        }
    }
}
