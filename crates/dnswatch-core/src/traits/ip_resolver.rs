// # IP Resolver Trait
//
// Defines the interface for discovering the caller's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP discovery services: `dnswatch-ip-http` crate

use crate::error::Result;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public-IP discovery implementations.
///
/// A resolver answers one question per call: "what is my public IPv4
/// address right now?". Implementations own their transport and their
/// fallback strategy across discovery services, but must only ever return
/// validated public addresses — the reconciler treats the result as
/// authoritative.
///
/// Implementations must be thread-safe and usable across async tasks.
/// Retry across ticks is owned by the reconciliation loop; a resolver call
/// is single-shot from the loop's perspective.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Discover the current public IPv4 address.
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: a validated public address
    /// - `Err(Error::Resolution)`: no discovery endpoint produced a valid
    ///   result
    async fn resolve(&self) -> Result<Ipv4Addr>;
}
