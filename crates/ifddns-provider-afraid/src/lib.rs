// # freedns.afraid.org Sync Provider
//
// This crate provides a `HostUpdater` for the freedns.afraid.org "sync"
// protocol: one authenticated GET per host.
//
// ## Request
//
// ```http
// GET https://<user>:<password>@sync.afraid.org/u/?content-type=json&h=<host>&ip=<address>
// ```
//
// IPv6 updates go to `v6.sync.afraid.org`. A host that only has an IPv6
// route may not reach the IPv4 endpoint at all, so the endpoint follows the
// family being published.
//
// ## Behaviour
//
// - HTTP 200 is success, whatever the body says
// - Any other status is an error carrying the status text
// - The body is logged verbatim and not interpreted
// - No retries, no timeout beyond the client defaults
//
// ## Security Requirements
//
// - The password NEVER appears in logs or error messages

use async_trait::async_trait;
use ifddns_core::config::{Config, Host};
use ifddns_core::traits::HostUpdater;
use ifddns_core::{AddressFamily, Error, Result};
use reqwest::StatusCode;
use std::net::IpAddr;
use url::Url;

/// Sync endpoint for IPv4 updates
pub const SYNC_ENDPOINT_V4: &str = "https://sync.afraid.org/u/";

/// Sync endpoint for IPv6 updates
pub const SYNC_ENDPOINT_V6: &str = "https://v6.sync.afraid.org/u/";

/// Base URLs, one per family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Endpoint used for A records
    pub ipv4: Url,
    /// Endpoint used for AAAA records
    pub ipv6: Url,
}

impl Endpoints {
    /// Parse a pair of base URLs
    pub fn new(ipv4: &str, ipv6: &str) -> Result<Self> {
        Ok(Self {
            ipv4: parse_endpoint(ipv4)?,
            ipv6: parse_endpoint(ipv6)?,
        })
    }

    /// The public freedns.afraid.org endpoints
    pub fn production() -> Result<Self> {
        Self::new(SYNC_ENDPOINT_V4, SYNC_ENDPOINT_V6)
    }

    /// Endpoint to use for `family`
    pub fn for_family(&self, family: AddressFamily) -> &Url {
        match family {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)
        .map_err(|e| Error::config(format!("Invalid endpoint {}: {}", endpoint, e)))?;

    if url.cannot_be_a_base() || !url.has_host() {
        return Err(Error::config(format!(
            "Endpoint {} cannot carry credentials",
            endpoint
        )));
    }

    Ok(url)
}

/// Build the update URL for one host
///
/// The query always carries `content-type=json`, `h` and `ip`; credentials
/// go into the URL's userinfo.
pub fn build_update_url(
    endpoint: &Url,
    user: &str,
    password: &str,
    host_name: &str,
    address: IpAddr,
) -> Result<Url> {
    let mut url = endpoint.clone();

    url.query_pairs_mut()
        .clear()
        .append_pair("content-type", "json")
        .append_pair("h", host_name)
        .append_pair("ip", &address.to_string());

    url.set_username(user)
        .map_err(|_| Error::config(format!("Endpoint {} cannot carry credentials", endpoint)))?;
    url.set_password(Some(password))
        .map_err(|_| Error::config(format!("Endpoint {} cannot carry credentials", endpoint)))?;

    Ok(url)
}

/// freedns.afraid.org sync provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
pub struct AfraidProvider {
    /// Account user name
    user: String,

    /// Account password
    /// ⚠️ NEVER log this value
    password: String,

    /// Base URLs per family
    endpoints: Endpoints,

    /// HTTP client for update requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for AfraidProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfraidProvider")
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl AfraidProvider {
    /// Create a provider for the public endpoints
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::with_endpoints(user, password, Endpoints::production()?)
    }

    /// Create a provider from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.user.clone(), config.password.clone())
    }

    /// Create a provider for custom endpoints
    pub fn with_endpoints(
        user: impl Into<String>,
        password: impl Into<String>,
        endpoints: Endpoints,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(user, password, endpoints, client)
    }

    /// Create a provider with a caller-supplied HTTP client
    pub fn with_client(
        user: impl Into<String>,
        password: impl Into<String>,
        endpoints: Endpoints,
        client: reqwest::Client,
    ) -> Result<Self> {
        let user = user.into();
        let password = password.into();

        if user.is_empty() || password.is_empty() {
            return Err(Error::config("Missing User or Password value."));
        }

        Ok(Self {
            user,
            password,
            endpoints,
            client,
        })
    }

    /// Build the update URL for `host` publishing `address`
    pub fn update_url(&self, host: &Host, address: IpAddr) -> Result<Url> {
        build_update_url(
            self.endpoints.for_family(host.family),
            &self.user,
            &self.password,
            &host.name,
            address,
        )
    }
}

#[async_trait]
impl HostUpdater for AfraidProvider {
    async fn update_host(&self, host: &Host, address: IpAddr) -> Result<()> {
        let url = self.update_url(host, address)?;

        tracing::debug!(
            "GET {} for {} ({})",
            self.endpoints.for_family(host.family),
            host.name,
            address
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::status(status.to_string()));
        }

        match response.text().await {
            Ok(body) => tracing::info!("{}", body),
            Err(e) => tracing::warn!("Failed to read response body: {}", e.without_url()),
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "afraid"
    }
}
