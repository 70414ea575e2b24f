// Hand-crafted async HTTP client for the Meraki Dashboard API v1.
//
// Base path: /api/v1/
// Auth: `Authorization: Bearer <key>` header

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, LINK, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    Device, InventoryDevice, ManagementInterface, ManagementInterfaceUpdate, Network,
    Organization, UplinkConfig,
};

/// Public Dashboard API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Page size requested from paginated endpoints (the API maximum for inventory).
const INVENTORY_PAGE_SIZE: u32 = 1000;

// ── Error response shape from the Dashboard API ──────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Meraki Dashboard API.
///
/// Uses bearer-token authentication and communicates via JSON REST
/// endpoints under `/api/v1/`.
#[derive(Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl DashboardClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `Authorization: Bearer <key>` as a default header on every
    /// request. An empty key is rejected here, before any request is made.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let key = api_key.expose_secret().trim();
        if key.is_empty() {
            return Err(Error::InvalidApiKey);
        }

        let mut headers = HeaderMap::new();
        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| Error::InvalidApiKey)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base URL ends with `/` so relative joins stay under `/api/v1/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"organizations"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// Follow `Link: <...>; rel=next` headers until the last page,
    /// concatenating every page's array.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut next = Some(self.url(path)?);
        let mut first = true;

        while let Some(url) = next.take() {
            debug!("GET {url} (paginated)");
            let request = if first {
                self.http.get(url).query(params)
            } else {
                self.http.get(url)
            };
            first = false;

            let resp = request.send().await?;
            next = next_page_link(resp.headers());
            let page: Vec<T> = Self::handle_response(resp).await?;
            trace!(received = page.len(), has_next = next.is_some(), "page fetched");
            all.extend(page);
        }

        Ok(all)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1);
            return Error::RateLimited { retry_after_secs };
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) if !err.errors.is_empty() => err.errors.join("; "),
            _ if raw.is_empty() => status.to_string(),
            _ => raw,
        };

        if status == reqwest::StatusCode::FORBIDDEN {
            Error::Forbidden { message }
        } else {
            Error::Dashboard {
                status: status.as_u16(),
                message,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Organizations ────────────────────────────────────────────────

    pub async fn list_organizations(&self) -> Result<Vec<Organization>, Error> {
        self.get("organizations").await
    }

    pub async fn list_organization_networks(&self, org_id: &str) -> Result<Vec<Network>, Error> {
        self.get(&format!("organizations/{org_id}/networks")).await
    }

    /// Every inventory record of the organization, across all pages.
    pub async fn list_organization_inventory(
        &self,
        org_id: &str,
    ) -> Result<Vec<InventoryDevice>, Error> {
        self.get_all_pages(
            &format!("organizations/{org_id}/inventory/devices"),
            &[("perPage", INVENTORY_PAGE_SIZE.to_string())],
        )
        .await
    }

    // ── Networks ─────────────────────────────────────────────────────

    pub async fn list_network_devices(&self, network_id: &str) -> Result<Vec<Device>, Error> {
        self.get(&format!("networks/{network_id}/devices")).await
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn get_management_interface(
        &self,
        serial: &str,
    ) -> Result<ManagementInterface, Error> {
        self.get(&format!("devices/{serial}/managementInterface"))
            .await
    }

    /// Write the primary uplink block back. Returns the configuration the
    /// dashboard reports after the update.
    pub async fn update_management_interface(
        &self,
        serial: &str,
        wan1: &UplinkConfig,
    ) -> Result<ManagementInterface, Error> {
        self.put(
            &format!("devices/{serial}/managementInterface"),
            &ManagementInterfaceUpdate { wan1 },
        )
        .await
    }
}

// ── Link header parsing ──────────────────────────────────────────────

/// Extract the `rel=next` target from an RFC 8288 `Link` header.
fn next_page_link(headers: &HeaderMap) -> Option<Url> {
    let raw = headers.get(LINK)?.to_str().ok()?;
    raw.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|p| {
            let p = p.trim();
            p == "rel=next" || p == "rel=\"next\""
        });
        if !is_next {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn link_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LINK, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn next_link_is_extracted() {
        let headers = link_headers(
            "<https://api.meraki.com/api/v1/organizations/1/inventory/devices?perPage=3>; rel=first, \
             <https://api.meraki.com/api/v1/organizations/1/inventory/devices?perPage=3&startingAfter=Q2XX>; rel=next",
        );
        let next = next_page_link(&headers).unwrap();
        assert_eq!(next.query(), Some("perPage=3&startingAfter=Q2XX"));
    }

    #[test]
    fn last_page_has_no_next() {
        let headers = link_headers("<https://api.meraki.com/api/v1/x?perPage=3>; rel=first");
        assert!(next_page_link(&headers).is_none());
        assert!(next_page_link(&HeaderMap::new()).is_none());
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = DashboardClient::from_reqwest(DEFAULT_BASE_URL, reqwest::Client::new()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.meraki.com/api/v1/");
        assert_eq!(
            client.url("organizations").unwrap().as_str(),
            "https://api.meraki.com/api/v1/organizations"
        );
    }

    #[test]
    fn empty_api_key_is_rejected_up_front() {
        let key = SecretString::from("   ".to_string());
        let err =
            DashboardClient::from_api_key(DEFAULT_BASE_URL, &key, &TransportConfig::default())
                .unwrap_err();
        assert!(err.is_auth());
    }
}
