#![allow(clippy::unwrap_used)]
// Static-device enumeration and DNS propagation against the in-memory dashboard.

mod support;

use std::net::Ipv4Addr;

use pretty_assertions::assert_eq;
use serde_json::json;

use merakidns_core::{
    BulkProgress, CoreError, DnsUpdate, NetworkId, OrganizationId, StaticDns,
    bulk_set_network_dns, bulk_set_network_dns_with, device_in_network, device_in_organization,
    is_device_static, list_static_devices, set_device_dns, update_devices_with,
};

use support::{FakeDashboard, static_wan1};

const NET: &str = "L_100";

fn net() -> NetworkId {
    NetworkId::new(NET)
}

// ── Enumeration ─────────────────────────────────────────────────────

#[tokio::test]
async fn static_devices_keep_listing_order() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "A");
    dash.add_dhcp(NET, "B");
    dash.add_static(NET, "C");

    let serials = list_static_devices(&dash, &net()).await.unwrap();
    assert_eq!(serials, vec!["A", "C"]);
}

#[tokio::test]
async fn device_without_wan1_is_not_static() {
    let mut dash = FakeDashboard::default();
    dash.add_device(NET, "AP-1", None);
    dash.add_static(NET, "MX-1");

    assert!(!is_device_static(&dash, "AP-1").await.unwrap());
    assert_eq!(list_static_devices(&dash, &net()).await.unwrap(), vec!["MX-1"]);
}

#[tokio::test]
async fn empty_network_has_no_static_devices() {
    let dash = FakeDashboard::default();
    assert!(list_static_devices(&dash, &net()).await.unwrap().is_empty());
}

// ── Single device ───────────────────────────────────────────────────

#[tokio::test]
async fn primary_update_preserves_every_other_field() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "A");

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    set_device_dns(&dash, "A", &update).await.unwrap();

    let mut expected = static_wan1(["9.9.9.9", "9.9.9.8"]);
    expected["staticDns"] = json!(["1.1.1.1", "9.9.9.8"]);
    assert_eq!(dash.written_json("A"), expected);
}

#[tokio::test]
async fn explicit_null_fields_are_written_back() {
    let mut dash = FakeDashboard::default();
    let mut wan1 = static_wan1(["9.9.9.9", "9.9.9.8"]);
    wan1["vlan"] = json!(null);
    wan1["staticGatewayIp"] = json!(null);
    dash.add_device(NET, "A", Some(wan1.clone()));

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    set_device_dns(&dash, "A", &update).await.unwrap();

    let mut expected = wan1;
    expected["staticDns"] = json!(["1.1.1.1", "9.9.9.8"]);
    let written = dash.written_json("A");
    assert_eq!(written, expected);
    assert_eq!(written.get("vlan"), Some(&json!(null)));
}

#[tokio::test]
async fn secondary_update_touches_only_the_second_slot() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "A");

    let update = DnsUpdate::new(None, Some("8.8.4.4")).unwrap();
    let sent = set_device_dns(&dash, "A", &update).await.unwrap();

    assert_eq!(sent.static_dns(), StaticDns::new("9.9.9.9", "8.8.4.4"));
    assert_eq!(dash.written_json("A")["staticDns"], json!(["9.9.9.9", "8.8.4.4"]));
}

#[tokio::test]
async fn both_slots_update_together() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "A");

    let update = DnsUpdate::new(Some("1.1.1.1"), Some("1.0.0.1")).unwrap();
    set_device_dns(&dash, "A", &update).await.unwrap();

    assert_eq!(dash.written_json("A")["staticDns"], json!(["1.1.1.1", "1.0.0.1"]));
    assert_eq!(dash.written_json("A")["vlan"], json!(10));
}

#[tokio::test]
async fn dhcp_device_is_never_written() {
    let mut dash = FakeDashboard::default();
    dash.add_dhcp(NET, "B");

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    let err = set_device_dns(&dash, "B", &update).await.unwrap_err();

    assert!(matches!(err, CoreError::DeviceNotStatic { ref serial } if serial == "B"));
    assert!(dash.written_serials().is_empty());
}

#[tokio::test]
async fn missing_wan1_is_reported() {
    let mut dash = FakeDashboard::default();
    dash.add_device(NET, "AP-1", None);

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    let err = set_device_dns(&dash, "AP-1", &update).await.unwrap_err();
    assert!(matches!(err, CoreError::MissingUplink { .. }), "got: {err:?}");
}

#[tokio::test]
async fn secondary_without_primary_is_refused() {
    let mut dash = FakeDashboard::default();
    dash.add_device(
        NET,
        "A",
        Some(json!({ "usingStaticIp": true, "staticIp": "10.0.0.5" })),
    );

    let update = DnsUpdate::secondary_only(Ipv4Addr::new(8, 8, 4, 4));
    let err = set_device_dns(&dash, "A", &update).await.unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }), "got: {err:?}");
    assert!(dash.written_serials().is_empty());
}

// ── Bulk ────────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_updates_each_static_device_once_in_order() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "S1");
    dash.add_dhcp(NET, "D1");
    dash.add_static(NET, "S2");
    dash.add_static(NET, "S3");

    let update = DnsUpdate::new(Some("1.1.1.1"), Some("1.0.0.1")).unwrap();
    let report = bulk_set_network_dns(&dash, &net(), &update).await.unwrap();

    assert_eq!(report.updated, vec!["S1", "S2", "S3"]);
    assert_eq!(dash.written_serials(), vec!["S1", "S2", "S3"]);
    let dns: Vec<_> = dash
        .writes
        .lock()
        .unwrap()
        .iter()
        .map(|(_, wan1)| wan1.static_dns())
        .collect();
    assert!(dns.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(dns[0].primary.as_deref(), Some("1.1.1.1"));
}

#[tokio::test]
async fn bulk_aborts_at_first_failure_and_reports_pending() {
    let mut dash = FakeDashboard::default();
    for serial in ["S1", "S2", "S3", "S4"] {
        dash.add_static(NET, serial);
    }
    dash.fail_update_for = Some("S2".into());

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    let err = bulk_set_network_dns(&dash, &net(), &update)
        .await
        .unwrap_err();

    match err {
        CoreError::BulkAborted {
            serial,
            updated,
            pending,
            source,
        } => {
            assert_eq!(serial, "S2");
            assert_eq!(updated, vec!["S1"]);
            assert_eq!(pending, vec!["S3", "S4"]);
            assert!(source.is_remote());
        }
        other => panic!("expected BulkAborted, got: {other:?}"),
    }
    assert_eq!(dash.written_serials(), vec!["S1"]);
}

#[tokio::test]
async fn bulk_progress_is_reported_per_device() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "S1");
    dash.add_static(NET, "S2");

    let mut events = Vec::new();
    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    bulk_set_network_dns_with(&dash, &net(), &update, |p| {
        events.push(match p {
            BulkProgress::Planned { serials } => format!("planned {}", serials.len()),
            BulkProgress::Updating { serial, index, total } => {
                format!("updating {serial} {}/{total}", index + 1)
            }
            BulkProgress::Updated { serial, .. } => format!("updated {serial}"),
        });
    })
    .await
    .unwrap();

    assert_eq!(
        events,
        vec![
            "planned 2",
            "updating S1 1/2",
            "updated S1",
            "updating S2 2/2",
            "updated S2",
        ]
    );
}

#[tokio::test]
async fn bulk_on_network_without_static_devices_is_a_no_op() {
    let mut dash = FakeDashboard::default();
    dash.add_dhcp(NET, "D1");

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    let report = bulk_set_network_dns(&dash, &net(), &update).await.unwrap();
    assert!(report.updated.is_empty());
    assert!(dash.written_serials().is_empty());
}

#[tokio::test]
async fn confirmed_device_that_left_static_aborts_the_run() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "S1");
    dash.add_static(NET, "S2");
    dash.add_static(NET, "S3");
    let confirmed = list_static_devices(&dash, &net()).await.unwrap();

    // S2 moves to DHCP between confirmation and the write.
    dash.interfaces.lock().unwrap().insert(
        "S2".into(),
        serde_json::from_value(json!({ "wan1": { "usingStaticIp": false } })).unwrap(),
    );

    let update = DnsUpdate::primary_only(Ipv4Addr::new(1, 1, 1, 1));
    let err = update_devices_with(&dash, &net(), &confirmed, &update, |_| {})
        .await
        .unwrap_err();

    match err {
        CoreError::BulkAborted {
            serial,
            updated,
            pending,
            source,
        } => {
            assert_eq!(serial, "S2");
            assert_eq!(updated, vec!["S1"]);
            assert_eq!(pending, vec!["S3"]);
            assert!(matches!(*source, CoreError::DeviceNotStatic { .. }));
        }
        other => panic!("expected BulkAborted, got: {other:?}"),
    }
    assert_eq!(dash.written_serials(), vec!["S1"]);
}

// ── Serial lookups ──────────────────────────────────────────────────

#[tokio::test]
async fn serial_lookups() {
    let mut dash = FakeDashboard::default();
    dash.add_static(NET, "Q2-1111");
    dash.inventory.insert(
        "549236".into(),
        serde_json::from_value(json!([
            { "serial": "Q2-1111", "networkId": NET },
            { "serial": "Q2-9999" }
        ]))
        .unwrap(),
    );

    let org = OrganizationId::new("549236");
    assert!(device_in_organization(&dash, &org, "Q2-9999").await.unwrap());
    assert!(!device_in_organization(&dash, &org, "Q2-0000").await.unwrap());
    assert!(device_in_network(&dash, &net(), "Q2-1111").await.unwrap());
    assert!(!device_in_network(&dash, &net(), "Q2-9999").await.unwrap());
}
