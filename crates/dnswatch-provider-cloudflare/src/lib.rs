// # Cloudflare DNS Client
//
// Reads and writes the one managed A record via the Cloudflare API v4.
//
// Two single-shot operations, both bearer-authenticated:
// - List DNS records filtered by name and type:
//   GET `/zones/:zone_id/dns_records?name=...&type=A`
// - Replace a record by id:
//   PUT `/zones/:zone_id/dns_records/:record_id`
//
// Retry, backoff and the decision whether to write at all are owned by the
// reconciliation loop; this client reports each round trip's outcome and
// nothing more. The provider's `success` flag on updates is returned
// verbatim — a 2xx response carrying `success: false` is an ordinary
// result, not a transport error.
//
// ## Security
//
// The API token never appears in logs; the `Debug` impl redacts it.
//
// API reference: https://developers.cloudflare.com/api/

use async_trait::async_trait;
use dnswatch_core::error::{Error, Result};
use dnswatch_core::traits::{DnsProvider, DnsRecordState};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::debug;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Timeout for Cloudflare API requests
const API_TIMEOUT: Duration = Duration::from_secs(15);

/// Cloudflare's sentinel TTL meaning "automatic"
const TTL_AUTOMATIC: u32 = 1;

/// Cloudflare client for one zone/record pair.
pub struct CloudflareDns {
    /// API token with DNS edit permission; never logged
    api_token: String,

    /// Zone containing the managed record
    zone_id: String,

    /// Fully qualified record name
    record_name: String,

    /// API base URL, overridable for tests
    base_url: String,

    /// HTTP client with the API timeout applied
    client: reqwest::Client,
}

// The API token stays out of Debug output
impl std::fmt::Debug for CloudflareDns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareDns")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .finish()
    }
}

#[derive(Deserialize)]
struct ListRecordsResponse {
    success: bool,
    #[serde(default)]
    result: Vec<RecordPayload>,
}

#[derive(Deserialize)]
struct RecordPayload {
    id: String,
    content: String,
    proxied: bool,
}

#[derive(Deserialize)]
struct UpdateResponse {
    success: bool,
}

impl CloudflareDns {
    /// Create a client for the given zone and record.
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
    ) -> Self {
        Self::with_base_url(api_token, zone_id, record_name, CLOUDFLARE_API_BASE)
    }

    /// Create a client against a custom API base URL, mainly for tests.
    pub fn with_base_url(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record_name: record_name.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(API_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Map a non-2xx API response onto the error taxonomy.
    fn status_error(&self, context: &str, status: reqwest::StatusCode) -> Error {
        match status.as_u16() {
            401 | 403 => Error::provider(format!(
                "{context}: authentication failed, check the API token (status {status})"
            )),
            404 => Error::not_found(format!("{}: {} (status 404)", context, self.record_name)),
            429 => Error::provider(format!("{context}: rate limited (status {status})")),
            500..=599 => Error::provider(format!(
                "{context}: Cloudflare server error (status {status})"
            )),
            _ => Error::provider(format!("{context}: unexpected status {status}")),
        }
    }
}

#[async_trait]
impl DnsProvider for CloudflareDns {
    async fn fetch_record(&self) -> Result<DnsRecordState> {
        let url = format!(
            "{}/zones/{}/dns_records?name={}&type=A",
            self.base_url, self.zone_id, self.record_name
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| Error::http(format!("record lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(self.status_error("record lookup", response.status()));
        }

        let body: ListRecordsResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("malformed record lookup response: {e}")))?;

        if !body.success {
            return Err(Error::not_found(format!(
                "lookup of {} was not successful",
                self.record_name
            )));
        }

        // At most one canonical match is assumed; the first entry wins.
        let record = body.result.into_iter().next().ok_or_else(|| {
            Error::not_found(format!("no A record named {}", self.record_name))
        })?;

        let content: Ipv4Addr = record.content.parse().map_err(|_| {
            Error::provider(format!(
                "record {} has non-IPv4 content '{}'",
                record.id, record.content
            ))
        })?;

        debug!(
            "fetched record {}: content={}, proxied={}",
            record.id, content, record.proxied
        );

        Ok(DnsRecordState {
            id: record.id,
            content,
            proxied: record.proxied,
        })
    }

    async fn update_record(&self, record_id: &str, ip: Ipv4Addr, proxied: bool) -> Result<bool> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        );

        let payload = serde_json::json!({
            "type": "A",
            "name": self.record_name,
            "content": ip.to_string(),
            "ttl": TTL_AUTOMATIC,
            "proxied": proxied,
        });

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("record update failed: {e}")))?;

        if !response.status().is_success() {
            return Err(self.status_error("record update", response.status()));
        }

        let body: UpdateResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(format!("malformed record update response: {e}")))?;

        Ok(body.success)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
