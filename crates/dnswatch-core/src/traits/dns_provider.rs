// # DNS Provider Trait
//
// Defines the interface for reading and writing the one managed DNS record
// via a provider API.
//
// ## Implementations
//
// - Cloudflare: `dnswatch-provider-cloudflare` crate

use crate::error::Result;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Provider-side state of the managed A record.
///
/// Owned by the provider; the agent only reads it and conditionally
/// overwrites it through [`DnsProvider::update_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecordState {
    /// Provider-assigned record id
    pub id: String,
    /// Current record content
    pub content: Ipv4Addr,
    /// Whether provider-side proxying/passthrough is enabled
    pub proxied: bool,
}

/// Trait for DNS provider implementations.
///
/// Two operations over an authenticated channel: a read-only fetch of the
/// managed record and a full replace by record id. Implementations are
/// single-shot — retry, backoff and the decision whether an update is
/// needed at all are owned by the reconciliation loop.
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the current state of the managed record.
    ///
    /// Read-only. Returns the first A record matching the configured name;
    /// providers are assumed to hold at most one canonical match, so no
    /// de-duplication is attempted.
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecordState)`: the record exists
    /// - `Err(Error::NotFound)`: the provider reported no match or an
    ///   unsuccessful response
    async fn fetch_record(&self) -> Result<DnsRecordState>;

    /// Replace the record's content and proxy flag.
    ///
    /// Issues a full replace (type A, configured name, provider-automatic
    /// TTL, explicit proxy flag) and returns the provider's own success
    /// indicator verbatim. `Ok(false)` — a well-formed response that
    /// reports failure — is a normal outcome the caller must handle, not
    /// a transport error.
    async fn update_record(&self, record_id: &str, ip: Ipv4Addr, proxied: bool) -> Result<bool>;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;
}
