// ── Session ──
//
// One operator run against one dashboard: connect (the credential check),
// pick an organization, pick a network, push DNS. Each step returns a new
// `Session` value and leaves the one it was called on untouched, so a failed
// step can be retried from the previous value. Transitions only go forward.

use std::sync::Arc;

use strum::Display;
use tracing::info;

use merakidns_api::{DashboardClient, Network, Organization};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::model::{BulkProgress, BulkReport, DnsUpdate, NetworkId, OrganizationId};
use crate::{propagate, resolve};

/// Where a session is in the connect → organization → network → DNS flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionStage {
    Connected,
    OrganizationSelected,
    NetworkSelected,
    DnsApplied,
}

/// An authenticated dashboard handle plus the selections made so far.
pub struct Session<D> {
    dashboard: Arc<D>,
    organization: Option<Organization>,
    network: Option<Network>,
    stage: SessionStage,
}

impl<D> Clone for Session<D> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            organization: self.organization.clone(),
            network: self.network.clone(),
            stage: self.stage,
        }
    }
}

impl<D> std::fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("stage", &self.stage)
            .field("organization", &self.organization.as_ref().map(|o| &o.id))
            .field("network", &self.network.as_ref().map(|n| &n.id))
            .finish_non_exhaustive()
    }
}

impl Session<DashboardClient> {
    /// Build the HTTP client from `config` and verify the credential.
    pub async fn open(config: &DashboardConfig) -> Result<Self, CoreError> {
        Self::connect(config.build_client()?).await
    }
}

impl<D: Dashboard> Session<D> {
    /// Verify the credential with one listing call and start a session.
    ///
    /// An invalid key fails with [`CoreError::AuthenticationFailed`].
    pub async fn connect(dashboard: D) -> Result<Self, CoreError> {
        let orgs = dashboard.organizations().await?;
        info!(organizations = orgs.len(), "API key accepted");
        Ok(Self {
            dashboard: Arc::new(dashboard),
            organization: None,
            network: None,
            stage: SessionStage::Connected,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn dashboard(&self) -> &D {
        &self.dashboard
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn organization_id(&self) -> Option<OrganizationId> {
        self.organization
            .as_ref()
            .map(|o| OrganizationId::new(o.id.as_str()))
    }

    pub fn network_id(&self) -> Option<NetworkId> {
        self.network.as_ref().map(|n| NetworkId::new(n.id.as_str()))
    }

    fn require(&self, stage: SessionStage, action: &'static str) -> Result<(), CoreError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.stage,
                action,
            })
        }
    }

    // ── Lookups (no transition) ──────────────────────────────────────

    /// Resolve an organization fragment without selecting it.
    pub async fn find_organization(&self, fragment: &str) -> Result<OrganizationId, CoreError> {
        resolve::find_organization(self.dashboard(), fragment).await
    }

    /// Resolve a network fragment in the selected organization without selecting it.
    pub async fn find_network(&self, fragment: &str) -> Result<NetworkId, CoreError> {
        let org_id = self.organization_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action: "look up a network",
        })?;
        resolve::find_network(self.dashboard(), &org_id, fragment).await
    }

    /// Every accessible organization, in listing order.
    pub async fn organizations(&self) -> Result<Vec<Organization>, CoreError> {
        self.dashboard().organizations().await
    }

    /// Every network of the selected organization, in listing order.
    pub async fn networks(&self) -> Result<Vec<Network>, CoreError> {
        let org_id = self.organization_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action: "list networks",
        })?;
        self.dashboard().networks(&org_id).await
    }

    pub async fn organization_names(&self) -> Result<Vec<String>, CoreError> {
        resolve::organization_names(self.dashboard()).await
    }

    pub async fn network_names(&self) -> Result<Vec<String>, CoreError> {
        let org_id = self.organization_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action: "list networks",
        })?;
        resolve::network_names(self.dashboard(), &org_id).await
    }

    /// Static devices of the selected network.
    pub async fn static_devices(&self) -> Result<Vec<String>, CoreError> {
        let network_id = self.network_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action: "list static devices",
        })?;
        propagate::list_static_devices(self.dashboard(), &network_id).await
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Connected → OrganizationSelected, by name fragment.
    pub async fn select_organization(&self, fragment: &str) -> Result<Self, CoreError> {
        self.require(SessionStage::Connected, "select an organization")?;
        let org = resolve::resolve_organization(self.dashboard(), fragment).await?;
        Ok(self.with_organization(org))
    }

    /// Connected → OrganizationSelected, by exact id.
    pub async fn select_organization_by_id(
        &self,
        org_id: &OrganizationId,
    ) -> Result<Self, CoreError> {
        self.require(SessionStage::Connected, "select an organization")?;
        let org = resolve::organization_by_id(self.dashboard(), org_id).await?;
        Ok(self.with_organization(org))
    }

    /// OrganizationSelected → NetworkSelected, by name fragment.
    pub async fn select_network(&self, fragment: &str) -> Result<Self, CoreError> {
        let org_id = self.selected_org_for("select a network")?;
        let network = resolve::resolve_network(self.dashboard(), &org_id, fragment).await?;
        Ok(self.with_network(network))
    }

    /// OrganizationSelected → NetworkSelected, by exact id.
    pub async fn select_network_by_id(&self, network_id: &NetworkId) -> Result<Self, CoreError> {
        let org_id = self.selected_org_for("select a network")?;
        let network = resolve::network_by_id(self.dashboard(), &org_id, network_id).await?;
        Ok(self.with_network(network))
    }

    fn selected_org_for(&self, action: &'static str) -> Result<OrganizationId, CoreError> {
        self.require(SessionStage::OrganizationSelected, action)?;
        self.organization_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action,
        })
    }

    fn with_organization(&self, org: Organization) -> Self {
        Self {
            organization: Some(org),
            stage: SessionStage::OrganizationSelected,
            ..self.clone()
        }
    }

    fn with_network(&self, network: Network) -> Self {
        Self {
            network: Some(network),
            stage: SessionStage::NetworkSelected,
            ..self.clone()
        }
    }

    /// NetworkSelected → DnsApplied.
    pub async fn apply_dns(&self, update: &DnsUpdate) -> Result<(Self, BulkReport), CoreError> {
        self.apply_dns_with(update, |_| {}).await
    }

    /// [`apply_dns`](Self::apply_dns) with a progress observer.
    pub async fn apply_dns_with<F>(
        &self,
        update: &DnsUpdate,
        observe: F,
    ) -> Result<(Self, BulkReport), CoreError>
    where
        F: FnMut(BulkProgress<'_>) + Send,
    {
        self.require(SessionStage::NetworkSelected, "apply DNS")?;
        let network_id = self.network_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action: "apply DNS",
        })?;
        let report =
            propagate::bulk_set_network_dns_with(self.dashboard(), &network_id, update, observe)
                .await?;
        Ok((self.applied(), report))
    }

    /// NetworkSelected → DnsApplied, writing exactly `serials`.
    ///
    /// For callers that listed [`static_devices`](Self::static_devices) and
    /// had the operator confirm them: the confirmed set is what gets written,
    /// without listing the network a second time.
    pub async fn apply_dns_to_with<F>(
        &self,
        serials: &[String],
        update: &DnsUpdate,
        observe: F,
    ) -> Result<(Self, BulkReport), CoreError>
    where
        F: FnMut(BulkProgress<'_>) + Send,
    {
        self.require(SessionStage::NetworkSelected, "apply DNS")?;
        let network_id = self.network_id().ok_or(CoreError::InvalidTransition {
            from: self.stage,
            action: "apply DNS",
        })?;
        let report =
            propagate::update_devices_with(self.dashboard(), &network_id, serials, update, observe)
                .await?;
        Ok((self.applied(), report))
    }

    fn applied(&self) -> Self {
        Self {
            stage: SessionStage::DnsApplied,
            ..self.clone()
        }
    }
}

/// `true` if the dashboard accepts the credential, `false` if it rejects it.
///
/// Errors other than a rejected key (network down, rate limit, ...) are
/// returned as-is rather than folded into `false`.
pub async fn validate_api_key<D: Dashboard>(dashboard: &D) -> Result<bool, CoreError> {
    match dashboard.organizations().await {
        Ok(_) => Ok(true),
        Err(CoreError::AuthenticationFailed { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}
