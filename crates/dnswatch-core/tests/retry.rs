//! Bounded retry: a failing provider is attempted at most `max_retries`
//! times per tick with the configured delay in between, then the tick is
//! abandoned with the loop state unchanged.

mod common;

use common::*;
use dnswatch_core::Reconciler;
use std::net::Ipv4Addr;
use std::time::Duration;

#[tokio::test]
async fn fetch_failure_exhausts_the_attempt_budget() {
    let resolver = StaticIpResolver::returning(Ipv4Addr::new(203, 0, 113, 5));
    let provider = ScriptedDnsProvider::failing_fetch();
    let notifier = RecordingNotifier::new();

    let mut reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        Box::new(notifier.clone()),
        &test_config("home.example.com"),
    );

    reconciler.tick().await;

    assert_eq!(provider.fetch_calls(), 3, "max_retries attempts, no more");
    assert_eq!(provider.update_calls(), 0);
    assert_eq!(reconciler.last_applied_ip(), None, "state untouched");
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn the_budget_is_per_tick() {
    let resolver = StaticIpResolver::returning(Ipv4Addr::new(203, 0, 113, 5));
    let provider = ScriptedDnsProvider::failing_fetch();

    let mut reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        Box::new(RecordingNotifier::new()),
        &test_config("home.example.com"),
    );

    reconciler.tick().await;
    reconciler.tick().await;

    assert_eq!(provider.fetch_calls(), 6, "a fresh budget every tick");
}

#[tokio::test(start_paused = true)]
async fn sleeps_the_retry_delay_between_attempts_only() {
    // Three attempts mean exactly two inter-attempt delays; there is no
    // sleep after the final failure. Paused time makes this exact.
    let mut config = test_config("home.example.com");
    config.retry_delay = 5;

    let resolver = StaticIpResolver::returning(Ipv4Addr::new(203, 0, 113, 5));
    let provider = ScriptedDnsProvider::failing_fetch();

    let mut reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        Box::new(RecordingNotifier::new()),
        &config,
    );

    let started = tokio::time::Instant::now();
    reconciler.tick().await;

    assert_eq!(provider.fetch_calls(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(10));
}

#[tokio::test]
async fn transport_failure_on_update_is_retried_from_the_fetch() {
    // Each attempt is a full fetch-compare-update round trip.
    let resolver = StaticIpResolver::returning(Ipv4Addr::new(203, 0, 113, 5));
    let provider =
        ScriptedDnsProvider::with_record("abc", Ipv4Addr::new(203, 0, 113, 4), false);
    provider.set_update_errors(true);

    let mut reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        Box::new(RecordingNotifier::new()),
        &test_config("home.example.com"),
    );

    reconciler.tick().await;

    assert_eq!(provider.fetch_calls(), 3);
    assert_eq!(provider.update_calls(), 3);
    assert_eq!(reconciler.last_applied_ip(), None);
}

#[tokio::test]
async fn first_success_stops_the_attempts() {
    let ip = Ipv4Addr::new(203, 0, 113, 5);
    let resolver = StaticIpResolver::returning(ip);
    let provider = ScriptedDnsProvider::with_record("abc", ip, false);

    let mut reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider.clone()),
        Box::new(RecordingNotifier::new()),
        &test_config("home.example.com"),
    );

    reconciler.tick().await;

    assert_eq!(provider.fetch_calls(), 1, "no attempts after success");
}
