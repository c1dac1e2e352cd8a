//! Test doubles and helpers for reconciliation loop tests.
//!
//! The doubles are counter-instrumented: each keeps its call counts and
//! recorded arguments behind `Arc`s, so a clone handed to the reconciler
//! shares state with the handle the test keeps for assertions.

#![allow(dead_code)]

use async_trait::async_trait;
use dnswatch_core::Config;
use dnswatch_core::error::{Error, Result};
use dnswatch_core::traits::{DnsProvider, DnsRecordState, IpResolver, Notifier};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Resolver that always returns the same address, or always fails.
#[derive(Clone)]
pub struct StaticIpResolver {
    ip: Arc<Mutex<Option<Ipv4Addr>>>,
    resolve_calls: Arc<AtomicUsize>,
}

impl StaticIpResolver {
    pub fn returning(ip: Ipv4Addr) -> Self {
        Self {
            ip: Arc::new(Mutex::new(Some(ip))),
            resolve_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            ip: Arc::new(Mutex::new(None)),
            resolve_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the address returned by subsequent resolve calls.
    pub fn set_ip(&self, ip: Ipv4Addr) {
        *self.ip.lock().unwrap() = Some(ip);
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IpResolver for StaticIpResolver {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.ip
            .lock()
            .unwrap()
            .ok_or_else(|| Error::resolution("scripted resolution failure"))
    }
}

struct ProviderScript {
    record: Option<DnsRecordState>,
    fetch_fails: bool,
    update_errors: bool,
    update_success: bool,
}

/// Provider double with a scripted record and failure switches.
///
/// Successful updates mutate the scripted record the way a real provider
/// would, so consecutive ticks observe the applied state.
#[derive(Clone)]
pub struct ScriptedDnsProvider {
    script: Arc<Mutex<ProviderScript>>,
    fetch_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<(String, Ipv4Addr, bool)>>>,
}

impl ScriptedDnsProvider {
    pub fn with_record(id: &str, content: Ipv4Addr, proxied: bool) -> Self {
        Self::from_script(ProviderScript {
            record: Some(DnsRecordState {
                id: id.to_string(),
                content,
                proxied,
            }),
            fetch_fails: false,
            update_errors: false,
            update_success: true,
        })
    }

    pub fn failing_fetch() -> Self {
        Self::from_script(ProviderScript {
            record: None,
            fetch_fails: true,
            update_errors: false,
            update_success: true,
        })
    }

    /// Fetches succeed but report that no record exists.
    pub fn missing_record() -> Self {
        Self::from_script(ProviderScript {
            record: None,
            fetch_fails: false,
            update_errors: false,
            update_success: true,
        })
    }

    fn from_script(script: ProviderScript) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            fetch_calls: Arc::new(AtomicUsize::new(0)),
            update_calls: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make subsequent updates answer with the given success flag.
    pub fn set_update_success(&self, success: bool) {
        self.script.lock().unwrap().update_success = success;
    }

    /// Make subsequent updates fail at the transport level.
    pub fn set_update_errors(&self, errors: bool) {
        self.script.lock().unwrap().update_errors = errors;
    }

    /// Make subsequent fetches succeed with the given record.
    pub fn set_record(&self, id: &str, content: Ipv4Addr, proxied: bool) {
        let mut script = self.script.lock().unwrap();
        script.fetch_fails = false;
        script.record = Some(DnsRecordState {
            id: id.to_string(),
            content,
            proxied,
        });
    }

    pub fn record(&self) -> Option<DnsRecordState> {
        self.script.lock().unwrap().record.clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    /// Recorded update arguments: (record id, content, proxied).
    pub fn updates(&self) -> Vec<(String, Ipv4Addr, bool)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for ScriptedDnsProvider {
    async fn fetch_record(&self) -> Result<DnsRecordState> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap();
        if script.fetch_fails {
            return Err(Error::provider("scripted fetch failure"));
        }
        script
            .record
            .clone()
            .ok_or_else(|| Error::not_found("no scripted record"))
    }

    async fn update_record(&self, record_id: &str, ip: Ipv4Addr, proxied: bool) -> Result<bool> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), ip, proxied));

        let mut script = self.script.lock().unwrap();
        if script.update_errors {
            return Err(Error::http("scripted transport failure"));
        }
        if !script.update_success {
            return Ok(false);
        }
        if let Some(record) = script.record.as_mut() {
            record.content = ip;
            record.proxied = proxied;
        }
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Notifier double that records every delivered message.
#[derive(Clone)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Minimal config for loop tests: three attempts, no retry delay.
pub fn test_config(record_name: &str) -> Config {
    Config {
        cloudflare_api_token: "test-token".to_string(),
        zone_id: "test-zone".to_string(),
        record_name: record_name.to_string(),
        check_interval: 1,
        max_retries: 3,
        retry_delay: 0,
        log_level: "info".to_string(),
        telegram_bot_token: None,
        telegram_chat_ids: Vec::new(),
    }
}
