// merakidns-core: Resolution and DNS propagation on top of merakidns-api.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod propagate;
pub mod resolve;
pub mod session;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsVerification};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use model::{BulkProgress, BulkReport, DnsUpdate, NetworkId, OrganizationId};
pub use propagate::{
    bulk_set_network_dns, bulk_set_network_dns_with, device_in_network, device_in_organization,
    is_device_static, list_static_devices, set_device_dns, update_devices_with,
};
pub use resolve::{
    find_network, find_organization, network_by_id, network_names, organization_by_id,
    organization_names, resolve_network, resolve_organization,
};
pub use session::{Session, SessionStage, validate_api_key};
pub use validate::{is_valid_ipv4, parse_dns_address};

// Wire types double as the domain model.
pub use merakidns_api::{
    DEFAULT_BASE_URL, DashboardClient, Device, InventoryDevice, ManagementInterface, Network,
    Organization, StaticDns, UplinkConfig,
};
