// ── Core value types ──
//
// Opaque identifiers for the two selections a session makes, the validated
// DNS change to push, and the outcome of a bulk run.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use merakidns_api::StaticDns;

use crate::error::CoreError;
use crate::validate::parse_dns_address;

// ── Identifiers ─────────────────────────────────────────────────────

/// Dashboard organization identifier (opaque string, e.g. `"549236"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

/// Dashboard network identifier (opaque string, e.g. `"L_6468294964811"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(String);

macro_rules! opaque_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

opaque_id!(OrganizationId);
opaque_id!(NetworkId);

// ── DnsUpdate ───────────────────────────────────────────────────────

/// A validated change to one or both DNS slots of a device's primary uplink.
///
/// Slots left `None` keep whatever the device already has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DnsUpdate {
    primary: Option<Ipv4Addr>,
    secondary: Option<Ipv4Addr>,
}

impl DnsUpdate {
    /// Validate raw operator input. Each supplied slot must be a dotted-quad
    /// IPv4 address, and at least one slot must be supplied.
    pub fn new(primary: Option<&str>, secondary: Option<&str>) -> Result<Self, CoreError> {
        let primary = primary
            .map(|p| parse_dns_address("primary DNS", p))
            .transpose()?;
        let secondary = secondary
            .map(|s| parse_dns_address("secondary DNS", s))
            .transpose()?;
        Self::from_addrs(primary, secondary)
    }

    pub fn from_addrs(
        primary: Option<Ipv4Addr>,
        secondary: Option<Ipv4Addr>,
    ) -> Result<Self, CoreError> {
        if primary.is_none() && secondary.is_none() {
            return Err(CoreError::validation(
                "DNS update",
                "supply a primary address, a secondary address, or both",
            ));
        }
        Ok(Self { primary, secondary })
    }

    pub fn primary_only(addr: Ipv4Addr) -> Self {
        Self {
            primary: Some(addr),
            secondary: None,
        }
    }

    pub fn secondary_only(addr: Ipv4Addr) -> Self {
        Self {
            primary: None,
            secondary: Some(addr),
        }
    }

    pub fn both(primary: Ipv4Addr, secondary: Ipv4Addr) -> Self {
        Self {
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }

    pub fn primary(&self) -> Option<Ipv4Addr> {
        self.primary
    }

    pub fn secondary(&self) -> Option<Ipv4Addr> {
        self.secondary
    }

    /// Overwrite the requested slots of `dns`, leaving the others untouched.
    pub fn apply_to(&self, dns: &mut StaticDns) {
        if let Some(p) = self.primary {
            dns.primary = Some(p.to_string());
        }
        if let Some(s) = self.secondary {
            dns.secondary = Some(s.to_string());
        }
    }
}

impl fmt::Display for DnsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = |a: Option<Ipv4Addr>| a.map_or_else(|| "(unchanged)".to_owned(), |a| a.to_string());
        write!(
            f,
            "primary={} secondary={}",
            slot(self.primary),
            slot(self.secondary)
        )
    }
}

// ── Bulk outcome ────────────────────────────────────────────────────

/// Successful outcome of a bulk DNS run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub network_id: NetworkId,
    pub dns: DnsUpdate,
    /// Serials updated, in the order they were written.
    pub updated: Vec<String>,
}

/// Progress notifications emitted during a bulk run.
#[derive(Debug, Clone, Copy)]
pub enum BulkProgress<'a> {
    /// Static devices found; `serials` is the update order.
    Planned { serials: &'a [String] },
    /// About to read-modify-write this device.
    Updating {
        serial: &'a str,
        index: usize,
        total: usize,
    },
    /// Device written.
    Updated {
        serial: &'a str,
        index: usize,
        total: usize,
    },
}
