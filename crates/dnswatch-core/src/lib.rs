// # dnswatch-core
//
// Core library for the dnswatch dynamic-DNS reconciliation agent.
//
// ## Architecture Overview
//
// This library provides the control core for keeping one DNS A record
// pointed at the machine's current public IPv4 address:
// - **IpResolver**: trait for discovering the current public address
// - **DnsProvider**: trait for reading and writing the managed record
// - **Notifier**: trait for best-effort operator notification
// - **Reconciler**: the polling loop that orchestrates the three
//
// ## Design Principles
//
// 1. **Single record, single loop**: one sequential control loop, no
//    concurrent ticks, one mutable piece of loop state
// 2. **Stateless across restarts**: a restart re-derives state by querying
//    the provider; nothing is persisted
// 3. **Failure containment**: errors never escape a tick except as log
//    output; only startup configuration failures are fatal
// 4. **Library-first**: the daemon binary is a thin wiring layer over this
//    crate

pub mod config;
pub mod error;
pub mod ipv4;
pub mod reconciler;
pub mod retry;
pub mod traits;

// Re-export core types for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use reconciler::Reconciler;
pub use retry::RetryPolicy;
pub use traits::{DnsProvider, DnsRecordState, IpResolver, Notifier};
