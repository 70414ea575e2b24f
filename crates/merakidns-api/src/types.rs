// Wire types for the Dashboard API v1 endpoints this crate covers.
//
// Field names follow the API's camelCase JSON. Types that are written back
// (the management interface) keep what they do not model in a JSON map so
// a read-modify-write sends it back untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

// ── Organizations & networks ─────────────────────────────────────────

/// An organization the API key can access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A network (site) inside an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub product_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// A device as returned by `GET /networks/{networkId}/devices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lan_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

/// A device record from the organization inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    pub serial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

// ── Management interface ─────────────────────────────────────────────

/// Response of `GET /devices/{serial}/managementInterface`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wan1: Option<UplinkConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wan2: Option<UplinkConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One uplink block (`wan1` / `wan2`) of the management interface.
///
/// Held as the JSON object the API returned, so a read-modify-write sends
/// back every key exactly as read: explicit `null`s, empty arrays and
/// fields this crate does not model included. Only `staticDns` is ever
/// rewritten, through [`set_static_dns`](Self::set_static_dns).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UplinkConfig {
    fields: Map<String, Value>,
}

impl UplinkConfig {
    /// `usingStaticIp`; absent or non-boolean reads as DHCP.
    pub fn using_static_ip(&self) -> bool {
        self.fields
            .get("usingStaticIp")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn static_ip(&self) -> Option<&str> {
        self.str_field("staticIp")
    }

    pub fn static_subnet_mask(&self) -> Option<&str> {
        self.str_field("staticSubnetMask")
    }

    pub fn static_gateway_ip(&self) -> Option<&str> {
        self.str_field("staticGatewayIp")
    }

    pub fn vlan(&self) -> Option<u16> {
        self.fields
            .get("vlan")
            .and_then(Value::as_u64)
            .and_then(|v| u16::try_from(v).ok())
    }

    /// The `staticDns` slots; absent, `null` or malformed reads as empty.
    pub fn static_dns(&self) -> StaticDns {
        self.fields
            .get("staticDns")
            .and_then(|v| StaticDns::deserialize(v).ok())
            .unwrap_or_default()
    }

    pub fn set_static_dns(&mut self, dns: &StaticDns) {
        self.fields
            .insert("staticDns".into(), Value::from(dns.to_slots()));
    }

    /// Raw value of any key, modelled or not.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// The `staticDns` pair, as two named slots.
///
/// On the wire this is a JSON array `[primary, secondary]`; either end may
/// be missing. A secondary without a primary serializes the primary slot as
/// an empty string so the secondary keeps its index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDns {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

impl StaticDns {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: Some(primary.into()),
            secondary: Some(secondary.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }

    fn to_slots(&self) -> Vec<&str> {
        match (&self.primary, &self.secondary) {
            (None, None) => Vec::new(),
            (Some(p), None) => vec![p.as_str()],
            (p, Some(s)) => vec![p.as_deref().unwrap_or(""), s.as_str()],
        }
    }
}

impl Serialize for StaticDns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_slots().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StaticDns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
        let mut slots = raw.unwrap_or_default().into_iter();
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        Ok(Self {
            primary: slots.next().and_then(non_empty),
            secondary: slots.next().and_then(non_empty),
        })
    }
}

/// Body of `PUT /devices/{serial}/managementInterface`.
///
/// Only the primary uplink is sent; `wan2` is left as the device has it.
#[derive(Debug, Serialize)]
pub(crate) struct ManagementInterfaceUpdate<'a> {
    pub wan1: &'a UplinkConfig,
}
