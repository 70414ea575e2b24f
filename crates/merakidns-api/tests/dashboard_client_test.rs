#![allow(clippy::unwrap_used)]
// Integration tests for `DashboardClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use merakidns_api::{DashboardClient, Error, StaticDns, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DashboardClient) {
    let server = MockServer::start().await;
    let key = SecretString::from("0123456789abcdef".to_string());
    let client = DashboardClient::from_api_key(
        &format!("{}/api/v1", server.uri()),
        &key,
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_organizations_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .and(header("authorization", "Bearer 0123456789abcdef"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "2930418", "name": "Acme Corp", "url": "https://n1.meraki.com/o/abc" },
            { "id": "2930419", "name": "Corp West" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let orgs = client.list_organizations().await.unwrap();

    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].id, "2930418");
    assert_eq!(orgs[0].name, "Acme Corp");
    assert_eq!(orgs[1].url, None);
}

#[tokio::test]
async fn test_list_networks_and_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/2930418/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "L_646829496481105433",
            "organizationId": "2930418",
            "name": "Branch Lyon",
            "productTypes": ["appliance", "switch"],
            "timeZone": "Europe/Paris"
        }])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/L_646829496481105433/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "serial": "Q234-ABCD-5678", "name": "MX-Lyon", "model": "MX68", "lanIp": "10.0.0.1" },
            { "serial": "Q234-ABCD-5679", "model": "MS120-8" }
        ])))
        .mount(&server)
        .await;

    let networks = client.list_organization_networks("2930418").await.unwrap();
    assert_eq!(networks[0].name, "Branch Lyon");
    assert_eq!(networks[0].product_types, vec!["appliance", "switch"]);

    let devices = client
        .list_network_devices("L_646829496481105433")
        .await
        .unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].lan_ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(devices[1].name, None);
}

#[tokio::test]
async fn test_inventory_follows_link_header() {
    let (server, client) = setup().await;
    let next = format!(
        "<{}/api/v1/organizations/42/inventory/devices?perPage=1000&startingAfter=Q2-0001>; rel=next",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/42/inventory/devices"))
        .and(query_param("perPage", "1000"))
        .and(query_param_is_missing("startingAfter"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next.as_str())
                .set_body_json(json!([{ "serial": "Q2-0001", "model": "MR36" }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/42/inventory/devices"))
        .and(query_param("startingAfter", "Q2-0001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "serial": "Q2-0002", "networkId": "N_1" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let inventory = client.list_organization_inventory("42").await.unwrap();

    let serials: Vec<_> = inventory.iter().map(|d| d.serial.as_str()).collect();
    assert_eq!(serials, vec!["Q2-0001", "Q2-0002"]);
    assert_eq!(inventory[1].network_id.as_deref(), Some("N_1"));
}

#[tokio::test]
async fn test_management_interface_read_modify_write() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/Q2-AAAA/managementInterface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wan1": {
                "wanEnabled": "enabled",
                "usingStaticIp": true,
                "staticIp": "10.0.0.5",
                "staticSubnetMask": "255.255.255.0",
                "staticGatewayIp": "10.0.0.1",
                "staticDns": ["9.9.9.9", "9.9.9.8"],
                "vlan": 10
            },
            "wan2": { "usingStaticIp": false }
        })))
        .mount(&server)
        .await;

    // Only wan1 goes back, with every field preserved and just the DNS changed.
    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/Q2-AAAA/managementInterface"))
        .and(body_json(json!({
            "wan1": {
                "wanEnabled": "enabled",
                "usingStaticIp": true,
                "staticIp": "10.0.0.5",
                "staticSubnetMask": "255.255.255.0",
                "staticGatewayIp": "10.0.0.1",
                "staticDns": ["1.1.1.1", "9.9.9.8"],
                "vlan": 10
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wan1": {
                "usingStaticIp": true,
                "staticIp": "10.0.0.5",
                "staticDns": ["1.1.1.1", "9.9.9.8"],
                "vlan": 10
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let current = client.get_management_interface("Q2-AAAA").await.unwrap();
    let mut wan1 = current.wan1.unwrap();
    assert!(wan1.using_static_ip());
    assert!(current.wan2.is_some());

    let mut dns = wan1.static_dns();
    dns.primary = Some("1.1.1.1".into());
    wan1.set_static_dns(&dns);
    let updated = client
        .update_management_interface("Q2-AAAA", &wan1)
        .await
        .unwrap();

    assert_eq!(
        updated.wan1.unwrap().static_dns(),
        StaticDns::new("1.1.1.1", "9.9.9.8")
    );
}

#[tokio::test]
async fn test_explicit_null_vlan_goes_back_as_null() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/devices/Q2-NULL/managementInterface"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wan1": {
                "usingStaticIp": true,
                "staticIp": "10.0.0.5",
                "staticDns": ["9.9.9.9", "9.9.9.8"],
                "vlan": null
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/Q2-NULL/managementInterface"))
        .and(body_json(json!({
            "wan1": {
                "usingStaticIp": true,
                "staticIp": "10.0.0.5",
                "staticDns": ["1.1.1.1", "9.9.9.8"],
                "vlan": null
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut wan1 = client
        .get_management_interface("Q2-NULL")
        .await
        .unwrap()
        .wan1
        .unwrap();
    assert_eq!(wan1.vlan(), None);

    let mut dns = wan1.static_dns();
    dns.primary = Some("1.1.1.1".into());
    wan1.set_static_dns(&dns);
    client
        .update_management_interface("Q2-NULL", &wan1)
        .await
        .unwrap();
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_invalid_api_key() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "errors": ["Invalid API key"] })),
        )
        .mount(&server)
        .await;

    let result = client.list_organizations().await;
    assert!(
        matches!(result, Err(Error::InvalidApiKey)),
        "expected InvalidApiKey, got: {result:?}"
    );
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/networks/N_1/devices"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
        .mount(&server)
        .await;

    let result = client.list_network_devices("N_1").await;
    assert!(
        matches!(result, Err(Error::RateLimited { retry_after_secs: 2 })),
        "expected RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn test_dashboard_errors_array_is_joined() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/Q2-BAD/managementInterface"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": ["Static DNS is invalid", "VLAN must be between 1 and 4094"]
        })))
        .mount(&server)
        .await;

    let wan1: merakidns_api::UplinkConfig =
        serde_json::from_value(json!({ "usingStaticIp": true })).unwrap();
    let err = client
        .update_management_interface("Q2-BAD", &wan1)
        .await
        .unwrap_err();

    match err {
        Error::Dashboard { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(
                message,
                "Static DNS is invalid; VLAN must be between 1 and 4094"
            );
        }
        other => panic!("expected Dashboard error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found_and_forbidden() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/missing/networks"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations/locked/networks"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let err = client
        .list_organization_networks("missing")
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");

    let err = client
        .list_organization_networks("locked")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Forbidden { ref message } if message == "Forbidden"));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/organizations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.list_organizations().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { ref body, .. } if body.contains("maintenance"))
    );
}
