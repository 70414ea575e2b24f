// ── Dashboard seam ──
//
// The handful of remote calls the core needs, abstracted so resolution and
// propagation run the same against the HTTP client and an in-memory fake.

use std::future::Future;

use merakidns_api::{
    DashboardClient, Device, InventoryDevice, ManagementInterface, Network, Organization,
    UplinkConfig,
};

use crate::error::CoreError;
use crate::model::{NetworkId, OrganizationId};

/// Remote dashboard operations used by the core.
///
/// Every call is a single request/response; implementations must not retry.
pub trait Dashboard: Send + Sync {
    /// Organizations accessible to the current credential, in listing order.
    fn organizations(&self) -> impl Future<Output = Result<Vec<Organization>, CoreError>> + Send;

    /// Networks of one organization, in listing order.
    fn networks(
        &self,
        org_id: &OrganizationId,
    ) -> impl Future<Output = Result<Vec<Network>, CoreError>> + Send;

    /// Full organization inventory (all pages).
    fn inventory(
        &self,
        org_id: &OrganizationId,
    ) -> impl Future<Output = Result<Vec<InventoryDevice>, CoreError>> + Send;

    /// Devices of one network, in listing order.
    fn devices(
        &self,
        network_id: &NetworkId,
    ) -> impl Future<Output = Result<Vec<Device>, CoreError>> + Send;

    /// Current management interface of a device.
    fn management_interface(
        &self,
        serial: &str,
    ) -> impl Future<Output = Result<ManagementInterface, CoreError>> + Send;

    /// Replace the device's primary uplink configuration with `wan1`.
    fn update_uplink(
        &self,
        serial: &str,
        wan1: &UplinkConfig,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl Dashboard for DashboardClient {
    async fn organizations(&self) -> Result<Vec<Organization>, CoreError> {
        Ok(self.list_organizations().await?)
    }

    async fn networks(&self, org_id: &OrganizationId) -> Result<Vec<Network>, CoreError> {
        Ok(self.list_organization_networks(org_id.as_str()).await?)
    }

    async fn inventory(&self, org_id: &OrganizationId) -> Result<Vec<InventoryDevice>, CoreError> {
        Ok(self.list_organization_inventory(org_id.as_str()).await?)
    }

    async fn devices(&self, network_id: &NetworkId) -> Result<Vec<Device>, CoreError> {
        Ok(self.list_network_devices(network_id.as_str()).await?)
    }

    async fn management_interface(&self, serial: &str) -> Result<ManagementInterface, CoreError> {
        Ok(self.get_management_interface(serial).await?)
    }

    async fn update_uplink(&self, serial: &str, wan1: &UplinkConfig) -> Result<(), CoreError> {
        self.update_management_interface(serial, wan1).await?;
        Ok(())
    }
}
