// ── Name-fragment resolution ──
//
// Organizations and networks are picked by a case-sensitive substring of
// their display name. The scan runs over the whole listing and keeps the
// LAST match, so a fragment matching several entities resolves to the one
// listed latest. Callers wanting a deterministic pick should supply a
// fragment that matches exactly one name.

use tracing::{debug, info};

use merakidns_api::{Network, Organization};

use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::model::{NetworkId, OrganizationId};

/// Last entry whose name contains `fragment`.
fn last_match<'a, T>(items: &'a [T], fragment: &str, name: impl Fn(&T) -> &str) -> Option<&'a T> {
    let mut found = None;
    for item in items {
        if name(item).contains(fragment) {
            found = Some(item);
        }
    }
    found
}

/// Resolve a name fragment to the full organization record.
pub async fn resolve_organization<D: Dashboard>(
    dashboard: &D,
    fragment: &str,
) -> Result<Organization, CoreError> {
    let orgs = dashboard.organizations().await?;
    debug!(count = orgs.len(), fragment, "scanning organizations");

    let org = last_match(&orgs, fragment, |o| o.name.as_str())
        .cloned()
        .ok_or_else(|| CoreError::OrganizationNotFound {
            fragment: fragment.into(),
        })?;
    info!(id = %org.id, name = %org.name, "organization resolved");
    Ok(org)
}

/// Resolve a name fragment to an organization identifier.
pub async fn find_organization<D: Dashboard>(
    dashboard: &D,
    fragment: &str,
) -> Result<OrganizationId, CoreError> {
    resolve_organization(dashboard, fragment)
        .await
        .map(|org| OrganizationId::from(org.id))
}

/// Resolve a name fragment to the full network record within `org_id`.
pub async fn resolve_network<D: Dashboard>(
    dashboard: &D,
    org_id: &OrganizationId,
    fragment: &str,
) -> Result<Network, CoreError> {
    let networks = dashboard.networks(org_id).await?;
    debug!(count = networks.len(), %org_id, fragment, "scanning networks");

    let network = last_match(&networks, fragment, |n| n.name.as_str())
        .cloned()
        .ok_or_else(|| CoreError::NetworkNotFound {
            fragment: fragment.into(),
        })?;
    info!(id = %network.id, name = %network.name, "network resolved");
    Ok(network)
}

/// Resolve a name fragment to a network identifier within `org_id`.
pub async fn find_network<D: Dashboard>(
    dashboard: &D,
    org_id: &OrganizationId,
    fragment: &str,
) -> Result<NetworkId, CoreError> {
    resolve_network(dashboard, org_id, fragment)
        .await
        .map(|net| NetworkId::from(net.id))
}

/// The organization with exactly this id.
pub async fn organization_by_id<D: Dashboard>(
    dashboard: &D,
    org_id: &OrganizationId,
) -> Result<Organization, CoreError> {
    let orgs = dashboard.organizations().await?;
    let org = orgs
        .into_iter()
        .find(|o| o.id == org_id.as_str())
        .ok_or_else(|| CoreError::OrganizationNotFound {
            fragment: org_id.to_string(),
        })?;
    info!(id = %org.id, name = %org.name, "organization picked by id");
    Ok(org)
}

/// The network with exactly this id within `org_id`.
pub async fn network_by_id<D: Dashboard>(
    dashboard: &D,
    org_id: &OrganizationId,
    network_id: &NetworkId,
) -> Result<Network, CoreError> {
    let networks = dashboard.networks(org_id).await?;
    let network = networks
        .into_iter()
        .find(|n| n.id == network_id.as_str())
        .ok_or_else(|| CoreError::NetworkNotFound {
            fragment: network_id.to_string(),
        })?;
    info!(id = %network.id, name = %network.name, "network picked by id");
    Ok(network)
}

/// Display names of every accessible organization, in listing order.
pub async fn organization_names<D: Dashboard>(dashboard: &D) -> Result<Vec<String>, CoreError> {
    let orgs = dashboard.organizations().await?;
    Ok(orgs.into_iter().map(|o| o.name).collect())
}

/// Display names of every network in `org_id`, in listing order.
pub async fn network_names<D: Dashboard>(
    dashboard: &D,
    org_id: &OrganizationId,
) -> Result<Vec<String>, CoreError> {
    let networks = dashboard.networks(org_id).await?;
    Ok(networks.into_iter().map(|n| n.name).collect())
}
