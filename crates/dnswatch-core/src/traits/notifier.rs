// # Notifier Trait
//
// Best-effort operator notification.
//
// ## Implementations
//
// - Telegram: `dnswatch-notify-telegram` crate

use async_trait::async_trait;

/// Trait for best-effort notification fan-out.
///
/// Notification delivery must never block or corrupt the reconciliation
/// outcome, so the method is infallible by signature: implementations log
/// and swallow every failure. An unconfigured notifier is a no-op, not an
/// error, and delivery to each target is independent — there is no shared
/// transaction across targets.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to every configured target.
    async fn notify(&self, message: &str);
}
