//! The reconciliation loop
//!
//! The `Reconciler` is the control core of the agent. On every tick it:
//! - discovers the current public IPv4 address via the `IpResolver`
//! - short-circuits when the address has not changed locally
//! - otherwise fetches the provider record, and writes it only on divergence
//! - notifies operators after a successful write
//!
//! ```text
//! ┌────────────┐   resolve    ┌──────────────┐   fetch/update   ┌─────────────┐
//! │ IpResolver │ ───────────► │  Reconciler  │ ───────────────► │ DnsProvider │
//! └────────────┘              └──────────────┘                  └─────────────┘
//!                                    │
//!                                    │ on applied update
//!                                    ▼
//!                              ┌──────────┐
//!                              │ Notifier │
//!                              └──────────┘
//! ```
//!
//! One sequential loop, no concurrent ticks. The loop suspends at exactly
//! two points: the inter-attempt retry delay and the inter-tick polling
//! sleep. A failed tick is logged and skipped; only startup configuration
//! errors are ever fatal.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::traits::{DnsProvider, IpResolver, Notifier};
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a successful reconciliation pass did.
enum ReconcileOutcome {
    /// A write was issued and accepted by the provider
    Applied,
    /// Provider content and proxy flag already matched; no write issued
    AlreadyConsistent,
}

/// Single-record reconciliation loop.
///
/// Owns its collaborators and the one piece of loop state,
/// `last_applied_ip` — the address most recently confirmed at the
/// provider. The field exists purely to skip redundant provider lookups
/// while the locally observed IP is stable; it is not persisted, and a
/// restarted process simply re-derives it by querying the provider on the
/// first changed tick.
///
/// ## Proxy policy
///
/// Every write sends `proxied: false`: the agent force-disables
/// provider-side proxying whenever it touches the record, and a record
/// whose content already matches but whose proxy flag is enabled is
/// rewritten just to disable it. Externally enabled proxying will be
/// fought on every IP change.
pub struct Reconciler {
    /// Public IP discovery
    resolver: Box<dyn IpResolver>,

    /// DNS record read/write
    provider: Box<dyn DnsProvider>,

    /// Best-effort operator notification
    notifier: Box<dyn Notifier>,

    /// Managed record name, for log lines and notification text
    record_name: String,

    /// Inter-tick polling interval
    check_interval: Duration,

    /// Bounded-retry policy for provider attempts within a tick
    retry: RetryPolicy,

    /// Address most recently confirmed at the provider
    last_applied_ip: Option<Ipv4Addr>,
}

impl Reconciler {
    /// Create a reconciler from validated configuration.
    pub fn new(
        resolver: Box<dyn IpResolver>,
        provider: Box<dyn DnsProvider>,
        notifier: Box<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            resolver,
            provider,
            notifier,
            record_name: config.record_name.clone(),
            check_interval: config.check_interval(),
            retry: RetryPolicy::new(config.max_retries, config.retry_delay()),
            last_applied_ip: None,
        }
    }

    /// The address most recently confirmed at the provider, if any.
    pub fn last_applied_ip(&self) -> Option<Ipv4Addr> {
        self.last_applied_ip
    }

    /// Run the loop until a shutdown signal arrives.
    ///
    /// Ticks run back to back with a `check_interval` sleep in between;
    /// there is no termination condition in normal operation. SIGINT stops
    /// the loop between ticks — an in-flight tick always runs to
    /// completion first.
    pub async fn run(&mut self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Test hook: run the loop with a programmatic shutdown signal instead
    /// of SIGINT. Production code should use [`Reconciler::run`].
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: tokio::sync::oneshot::Receiver<()>,
    ) -> Result<()> {
        self.run_internal(Some(shutdown_rx)).await
    }

    async fn run_internal(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!(
            "starting reconciliation loop for {} (interval {}s, {} attempts per tick)",
            self.record_name,
            self.check_interval.as_secs(),
            self.retry.max_attempts
        );

        if let Some(mut rx) = shutdown_rx {
            loop {
                self.tick().await;
                tokio::select! {
                    _ = tokio::time::sleep(self.check_interval) => {}
                    _ = &mut rx => {
                        info!("shutdown signal received, stopping loop");
                        break;
                    }
                }
            }
        } else {
            loop {
                self.tick().await;
                tokio::select! {
                    _ = tokio::time::sleep(self.check_interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received, stopping loop");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Run a single reconciliation pass.
    ///
    /// Public so tests (and embedders) can drive individual ticks without
    /// the polling loop. Never fails: every error is logged and the tick
    /// skipped, leaving `last_applied_ip` untouched.
    pub async fn tick(&mut self) {
        let current_ip = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!("skipping tick: {}", e);
                return;
            }
        };

        // Local short-circuit only. The provider's actual state is
        // consulted exclusively when the observed IP changed.
        if self.last_applied_ip == Some(current_ip) {
            debug!("public IP unchanged ({}), nothing to do", current_ip);
            return;
        }

        match self.last_applied_ip {
            Some(previous) => info!("public IP {} (previously {})", current_ip, previous),
            None => info!("public IP {} (no address applied yet)", current_ip),
        }

        self.reconcile(current_ip).await;
    }

    /// Reconcile the provider record with `ip`, retrying per the policy.
    ///
    /// `last_applied_ip` advances only after the provider is confirmed
    /// consistent — either already in sync or freshly written. An
    /// exhausted retry budget abandons the tick with state unchanged, so
    /// the next tick starts over from the provider lookup.
    async fn reconcile(&mut self, ip: Ipv4Addr) {
        for attempt in 1..=self.retry.max_attempts {
            match self.try_reconcile(ip).await {
                Ok(ReconcileOutcome::Applied) => {
                    info!("{} now points at {}", self.record_name, ip);
                    let message = format!("Public IP updated for {}:\n{}", self.record_name, ip);
                    self.notifier.notify(&message).await;
                    self.last_applied_ip = Some(ip);
                    return;
                }
                Ok(ReconcileOutcome::AlreadyConsistent) => {
                    info!("{} already points at {}, no update needed", self.record_name, ip);
                    self.last_applied_ip = Some(ip);
                    return;
                }
                Err(e) => {
                    error!(
                        "reconciliation attempt {}/{} failed: {}",
                        attempt, self.retry.max_attempts, e
                    );
                    if attempt < self.retry.max_attempts {
                        debug!("retrying in {:?}", self.retry.delay);
                        tokio::time::sleep(self.retry.delay).await;
                    } else {
                        error!("retry budget exhausted, giving up until the next cycle");
                    }
                }
            }
        }
    }

    /// One provider round trip: fetch, compare, conditionally write.
    async fn try_reconcile(&self, ip: Ipv4Addr) -> Result<ReconcileOutcome> {
        let record = self.provider.fetch_record().await?;
        debug!(
            "provider record {}: content={}, proxied={}",
            record.id, record.content, record.proxied
        );

        if record.content == ip && !record.proxied {
            return Ok(ReconcileOutcome::AlreadyConsistent);
        }

        info!(
            "updating {}: {} -> {}, proxied=false",
            self.record_name, record.content, ip
        );
        let accepted = self.provider.update_record(&record.id, ip, false).await?;
        if !accepted {
            return Err(Error::update_rejected(format!(
                "{} reported success=false",
                self.provider.provider_name()
            )));
        }

        Ok(ReconcileOutcome::Applied)
    }
}
