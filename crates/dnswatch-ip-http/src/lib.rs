// # HTTP IP Resolver
//
// Discovers the machine's public IPv4 address by querying a fixed, ordered
// list of plain-text discovery services.
//
// ## Fallback strategy
//
// Endpoints are tried strictly in order and the first validator-accepted
// answer wins — later endpoints are not contacted at all. An endpoint that
// errors (network, timeout, non-2xx) or returns something that is not a
// valid public IPv4 address is logged and skipped; it is never retried
// within the same resolve call. Tolerating any single misbehaving service
// here is what keeps the reconciliation loop free of discovery-side
// failover logic.

use async_trait::async_trait;
use dnswatch_core::error::{Error, Result};
use dnswatch_core::ipv4::parse_public_ipv4;
use dnswatch_core::traits::IpResolver;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, warn};

/// Discovery endpoints in priority order.
const DEFAULT_ENDPOINTS: &[&str] = &[
    "https://api.ipify.org",
    "https://ifconfig.me/ip",
    "https://checkip.amazonaws.com",
];

/// Per-request timeout for discovery services.
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Ordered-fallback public-IP resolver over plain-text HTTP services.
pub struct HttpIpResolver {
    /// Discovery endpoints, tried in order
    endpoints: Vec<String>,

    /// HTTP client with the discovery timeout applied
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver over the default endpoint list.
    pub fn new() -> Self {
        Self::with_endpoints(DEFAULT_ENDPOINTS.iter().map(|s| s.to_string()).collect())
    }

    /// Create a resolver over a custom endpoint list, mainly for tests.
    pub fn with_endpoints(endpoints: Vec<String>) -> Self {
        Self {
            endpoints,
            client: reqwest::Client::builder()
                .timeout(DISCOVERY_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Fetch one endpoint's response body.
    async fn fetch_body(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::http(format!(
                "{} answered {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read body from {url}: {e}")))
    }
}

impl Default for HttpIpResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        let mut last_error: Option<Error> = None;

        for url in &self.endpoints {
            match self.fetch_body(url).await {
                Ok(body) => {
                    let candidate = body.trim();
                    match parse_public_ipv4(candidate) {
                        Some(ip) => {
                            debug!("public IP from {}: {}", url, ip);
                            return Ok(ip);
                        }
                        None => {
                            warn!(
                                "response from {} is not a valid public IPv4: '{}'",
                                url, candidate
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!("failed to fetch public IP from {}: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(Error::resolution(match last_error {
            Some(e) => format!("all discovery endpoints exhausted (last error: {e})"),
            None => "all discovery endpoints exhausted".to_string(),
        }))
    }
}
