#![allow(clippy::unwrap_used)]
// Organization / network resolution against the in-memory dashboard.

mod support;

use pretty_assertions::assert_eq;

use merakidns_core::{
    CoreError, OrganizationId, find_network, find_organization, network_names,
    organization_names, resolve_organization,
};

use support::FakeDashboard;

fn three_orgs() -> FakeDashboard {
    FakeDashboard::with_orgs(&[
        ("101", "Acme Corp"),
        ("102", "Corp West"),
        ("103", "Globex Industries"),
    ])
}

#[tokio::test]
async fn unique_fragment_resolves_its_organization() {
    let dash = three_orgs();
    let id = find_organization(&dash, "Globex").await.unwrap();
    assert_eq!(id, OrganizationId::new("103"));
}

#[tokio::test]
async fn ambiguous_fragment_takes_last_listed_match() {
    // "Corp" is in both "Acme Corp" (index 0) and "Corp West" (index 1):
    // the later listing wins.
    let dash = three_orgs();
    let org = resolve_organization(&dash, "Corp").await.unwrap();
    assert_eq!(org.id, "102");
    assert_eq!(org.name, "Corp West");
}

#[tokio::test]
async fn reversed_listing_flips_the_tie_break() {
    let dash = FakeDashboard::with_orgs(&[("102", "Corp West"), ("101", "Acme Corp")]);
    let id = find_organization(&dash, "Corp").await.unwrap();
    assert_eq!(id.as_str(), "101");
}

#[tokio::test]
async fn unmatched_fragment_is_not_found() {
    let dash = three_orgs();
    let err = find_organization(&dash, "Initech").await.unwrap_err();
    assert!(
        matches!(err, CoreError::OrganizationNotFound { ref fragment } if fragment == "Initech"),
        "got: {err:?}"
    );
    assert!(err.is_not_found());
}

#[tokio::test]
async fn matching_is_case_sensitive() {
    let dash = three_orgs();
    let err = find_organization(&dash, "acme").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn networks_resolve_within_their_organization() {
    let mut dash = three_orgs();
    dash.add_networks("102", &[("N_1", "Lyon HQ"), ("N_2", "Lyon Warehouse")]);
    dash.add_networks("103", &[("N_9", "Lyon Lab")]);

    let org = OrganizationId::new("102");
    assert_eq!(find_network(&dash, &org, "HQ").await.unwrap().as_str(), "N_1");
    assert_eq!(find_network(&dash, &org, "Lyon").await.unwrap().as_str(), "N_2");

    let err = find_network(&dash, &org, "Lab").await.unwrap_err();
    assert!(matches!(err, CoreError::NetworkNotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn names_are_listed_in_order() {
    let mut dash = three_orgs();
    dash.add_networks("101", &[("N_1", "Paris"), ("N_2", "Berlin")]);

    assert_eq!(
        organization_names(&dash).await.unwrap(),
        vec!["Acme Corp", "Corp West", "Globex Industries"]
    );
    assert_eq!(
        network_names(&dash, &OrganizationId::new("101")).await.unwrap(),
        vec!["Paris", "Berlin"]
    );
}

#[tokio::test]
async fn rejected_key_surfaces_as_authentication_error() {
    let dash = FakeDashboard {
        reject_key: true,
        ..three_orgs()
    };
    let err = find_organization(&dash, "Corp").await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
}
