// ── Static-device DNS propagation ──
//
// Device DNS is changed with a read-modify-write of the primary uplink:
// read the management interface, overwrite the requested DNS slot(s), write
// the whole `wan1` block back. There is no optimistic concurrency check, so
// an edit made on the dashboard between the read and the write is lost.
// Devices are handled strictly one at a time, in listing order.

use tracing::{debug, info, warn};

use merakidns_api::UplinkConfig;

use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::model::{BulkProgress, BulkReport, DnsUpdate, NetworkId, OrganizationId};

/// Returns `true` if the device's primary uplink uses static addressing.
///
/// A device without a `wan1` block is not static.
pub async fn is_device_static<D: Dashboard>(dashboard: &D, serial: &str) -> Result<bool, CoreError> {
    let mi = dashboard.management_interface(serial).await?;
    Ok(mi.wan1.is_some_and(|wan1| wan1.using_static_ip()))
}

/// Serials of the network's static-addressed devices, in listing order.
pub async fn list_static_devices<D: Dashboard>(
    dashboard: &D,
    network_id: &NetworkId,
) -> Result<Vec<String>, CoreError> {
    let devices = dashboard.devices(network_id).await?;
    debug!(%network_id, count = devices.len(), "checking addressing mode");

    let mut statics = Vec::new();
    for device in devices {
        if is_device_static(dashboard, &device.serial).await? {
            statics.push(device.serial);
        } else {
            debug!(serial = %device.serial, "skipping DHCP device");
        }
    }
    Ok(statics)
}

/// Change the DNS slot(s) named by `update` on one device.
///
/// Every other `wan1` field is written back exactly as read. Returns the
/// uplink configuration that was sent.
pub async fn set_device_dns<D: Dashboard>(
    dashboard: &D,
    serial: &str,
    update: &DnsUpdate,
) -> Result<UplinkConfig, CoreError> {
    let mi = dashboard.management_interface(serial).await?;
    let mut wan1 = mi.wan1.ok_or_else(|| CoreError::MissingUplink {
        serial: serial.into(),
    })?;

    if !wan1.using_static_ip() {
        return Err(CoreError::DeviceNotStatic {
            serial: serial.into(),
        });
    }

    let mut dns = wan1.static_dns();
    update.apply_to(&mut dns);
    if dns.primary.is_none() {
        return Err(CoreError::validation(
            "DNS update",
            format!("device {serial} has no primary DNS; a secondary alone cannot be set"),
        ));
    }
    wan1.set_static_dns(&dns);

    dashboard.update_uplink(serial, &wan1).await?;
    info!(serial, %update, "device DNS updated");
    Ok(wan1)
}

/// Apply `update` to every static device of the network.
pub async fn bulk_set_network_dns<D: Dashboard>(
    dashboard: &D,
    network_id: &NetworkId,
    update: &DnsUpdate,
) -> Result<BulkReport, CoreError> {
    bulk_set_network_dns_with(dashboard, network_id, update, |_| {}).await
}

/// [`bulk_set_network_dns`] with a progress observer.
///
/// Stops at the first failing device and returns
/// [`CoreError::BulkAborted`] naming the devices already updated and the
/// ones never attempted.
pub async fn bulk_set_network_dns_with<D, F>(
    dashboard: &D,
    network_id: &NetworkId,
    update: &DnsUpdate,
    observe: F,
) -> Result<BulkReport, CoreError>
where
    D: Dashboard,
    F: FnMut(BulkProgress<'_>) + Send,
{
    let serials = list_static_devices(dashboard, network_id).await?;
    update_devices_with(dashboard, network_id, &serials, update, observe).await
}

/// Apply `update` to exactly `serials`, in order, with the same abort
/// policy as [`bulk_set_network_dns_with`].
///
/// Used when the device set was listed (and confirmed) beforehand. Each
/// device is still re-read, so one that switched to DHCP in between aborts
/// the run instead of being written.
pub async fn update_devices_with<D, F>(
    dashboard: &D,
    network_id: &NetworkId,
    serials: &[String],
    update: &DnsUpdate,
    mut observe: F,
) -> Result<BulkReport, CoreError>
where
    D: Dashboard,
    F: FnMut(BulkProgress<'_>) + Send,
{
    let total = serials.len();
    info!(%network_id, total, %update, "starting bulk DNS update");
    observe(BulkProgress::Planned { serials });

    let mut updated = Vec::with_capacity(total);
    for (index, serial) in serials.iter().enumerate() {
        observe(BulkProgress::Updating {
            serial,
            index,
            total,
        });

        if let Err(source) = set_device_dns(dashboard, serial, update).await {
            let pending = serials.get(index + 1..).unwrap_or_default().to_vec();
            warn!(
                serial,
                updated = updated.len(),
                pending = pending.len(),
                error = %source,
                "bulk DNS update aborted"
            );
            return Err(CoreError::BulkAborted {
                serial: serial.clone(),
                updated,
                pending,
                source: Box::new(source),
            });
        }

        updated.push(serial.clone());
        observe(BulkProgress::Updated {
            serial,
            index,
            total,
        });
    }

    Ok(BulkReport {
        network_id: network_id.clone(),
        dns: *update,
        updated,
    })
}

// ── Serial lookups ──────────────────────────────────────────────────

/// Returns `true` if `serial` is in the organization inventory.
pub async fn device_in_organization<D: Dashboard>(
    dashboard: &D,
    org_id: &OrganizationId,
    serial: &str,
) -> Result<bool, CoreError> {
    let inventory = dashboard.inventory(org_id).await?;
    Ok(inventory.iter().any(|d| d.serial == serial))
}

/// Returns `true` if `serial` is one of the network's devices.
pub async fn device_in_network<D: Dashboard>(
    dashboard: &D,
    network_id: &NetworkId,
    serial: &str,
) -> Result<bool, CoreError> {
    let devices = dashboard.devices(network_id).await?;
    Ok(devices.iter().any(|d| d.serial == serial))
}
