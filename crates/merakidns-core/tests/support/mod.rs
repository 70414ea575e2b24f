// In-memory dashboard used by the core integration tests.
#![allow(clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::json;

use merakidns_core::{
    CoreError, Dashboard, Device, InventoryDevice, ManagementInterface, Network, NetworkId,
    Organization, OrganizationId, UplinkConfig,
};

/// Fake dashboard: canned listings, a mutable management-interface table,
/// and a log of every write in the order it happened.
#[derive(Default)]
pub struct FakeDashboard {
    pub orgs: Vec<Organization>,
    pub networks: HashMap<String, Vec<Network>>,
    pub devices: HashMap<String, Vec<Device>>,
    pub inventory: HashMap<String, Vec<InventoryDevice>>,
    pub interfaces: Mutex<HashMap<String, ManagementInterface>>,
    pub writes: Mutex<Vec<(String, UplinkConfig)>>,
    pub reads: Mutex<Vec<String>>,
    pub device_listings: Mutex<usize>,
    pub fail_update_for: Option<String>,
    pub reject_key: bool,
}

impl FakeDashboard {
    pub fn with_orgs(names: &[(&str, &str)]) -> Self {
        Self {
            orgs: names
                .iter()
                .map(|(id, name)| Organization {
                    id: (*id).into(),
                    name: (*name).into(),
                    url: None,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn add_networks(&mut self, org_id: &str, nets: &[(&str, &str)]) {
        self.networks.insert(
            org_id.into(),
            nets.iter()
                .map(|(id, name)| network(id, name, org_id))
                .collect(),
        );
    }

    /// Add a device to `network_id` with the given wan1 JSON block
    /// (`None` = no wan1 at all).
    pub fn add_device(&mut self, network_id: &str, serial: &str, wan1: Option<serde_json::Value>) {
        self.devices
            .entry(network_id.into())
            .or_default()
            .push(device(serial, network_id));

        let mi = match wan1 {
            Some(wan1) => json!({ "wan1": wan1 }),
            None => json!({}),
        };
        self.interfaces
            .lock()
            .unwrap()
            .insert(serial.into(), serde_json::from_value(mi).unwrap());
    }

    pub fn add_static(&mut self, network_id: &str, serial: &str) {
        self.add_device(network_id, serial, Some(static_wan1(["9.9.9.9", "9.9.9.8"])));
    }

    pub fn add_dhcp(&mut self, network_id: &str, serial: &str) {
        self.add_device(
            network_id,
            serial,
            Some(json!({ "usingStaticIp": false, "vlan": null })),
        );
    }

    pub fn written_serials(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(s, _)| s.clone())
            .collect()
    }

    pub fn written_json(&self, serial: &str) -> serde_json::Value {
        let writes = self.writes.lock().unwrap();
        let (_, wan1) = writes.iter().find(|(s, _)| s == serial).unwrap();
        serde_json::to_value(wan1).unwrap()
    }
}

pub fn static_wan1(dns: [&str; 2]) -> serde_json::Value {
    json!({
        "wanEnabled": "not configured",
        "usingStaticIp": true,
        "staticIp": "10.0.0.5",
        "staticSubnetMask": "255.255.255.0",
        "staticGatewayIp": "10.0.0.1",
        "staticDns": dns,
        "vlan": 10
    })
}

pub fn network(id: &str, name: &str, org_id: &str) -> Network {
    Network {
        id: id.into(),
        name: name.into(),
        organization_id: Some(org_id.into()),
        product_types: vec!["appliance".into()],
        time_zone: None,
    }
}

pub fn device(serial: &str, network_id: &str) -> Device {
    Device {
        serial: serial.into(),
        name: None,
        model: Some("MX68".into()),
        mac: None,
        lan_ip: None,
        network_id: Some(network_id.into()),
    }
}

fn auth_check(fake: &FakeDashboard) -> Result<(), CoreError> {
    if fake.reject_key {
        Err(CoreError::AuthenticationFailed {
            message: "Invalid API key".into(),
        })
    } else {
        Ok(())
    }
}

impl Dashboard for FakeDashboard {
    async fn organizations(&self) -> Result<Vec<Organization>, CoreError> {
        auth_check(self)?;
        Ok(self.orgs.clone())
    }

    async fn networks(&self, org_id: &OrganizationId) -> Result<Vec<Network>, CoreError> {
        auth_check(self)?;
        Ok(self
            .networks
            .get(org_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn inventory(&self, org_id: &OrganizationId) -> Result<Vec<InventoryDevice>, CoreError> {
        auth_check(self)?;
        Ok(self
            .inventory
            .get(org_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn devices(&self, network_id: &NetworkId) -> Result<Vec<Device>, CoreError> {
        auth_check(self)?;
        *self.device_listings.lock().unwrap() += 1;
        Ok(self
            .devices
            .get(network_id.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn management_interface(&self, serial: &str) -> Result<ManagementInterface, CoreError> {
        auth_check(self)?;
        self.reads.lock().unwrap().push(serial.into());
        self.interfaces
            .lock()
            .unwrap()
            .get(serial)
            .cloned()
            .ok_or_else(|| CoreError::Remote {
                message: format!("no device {serial}"),
                status: Some(404),
            })
    }

    async fn update_uplink(&self, serial: &str, wan1: &UplinkConfig) -> Result<(), CoreError> {
        auth_check(self)?;
        if self.fail_update_for.as_deref() == Some(serial) {
            return Err(CoreError::Remote {
                message: "Internal server error".into(),
                status: Some(500),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((serial.into(), wan1.clone()));
        if let Some(mi) = self.interfaces.lock().unwrap().get_mut(serial) {
            mi.wan1 = Some(wan1.clone());
        }
        Ok(())
    }
}
