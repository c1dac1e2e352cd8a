// # dnswatchd - dnswatch daemon
//
// Thin entry point for the reconciliation agent. The daemon is
// responsible for:
// 1. Loading and validating the JSON configuration file
// 2. Initializing tracing
// 3. Wiring the resolver, provider and notifier into the Reconciler
// 4. Running the loop until SIGINT
//
// All reconciliation logic lives in dnswatch-core; nothing here makes
// decisions about DNS state.
//
// ## Configuration
//
// The config file path comes from the first CLI argument, falling back to
// the `DNSWATCH_CONFIG` environment variable:
//
// ```bash
// dnswatchd /etc/dnswatch/config.json
// # or
// DNSWATCH_CONFIG=/etc/dnswatch/config.json dnswatchd
// ```
//
// Required keys: cloudflare_api_token, zone_id, record_name.
// Optional keys: check_interval (30), max_retries (5), retry_delay (5),
// log_level ("info"), telegram_bot_token, telegram_chat_ids.

use anyhow::Result;
use dnswatch_core::{Config, Reconciler};
use dnswatch_ip_http::HttpIpResolver;
use dnswatch_notify_telegram::TelegramNotifier;
use dnswatch_provider_cloudflare::CloudflareDns;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: clean shutdown
/// - 1: configuration or startup error
/// - 2: runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Resolve the config file path from argv or the environment.
fn config_path() -> Option<String> {
    env::args()
        .nth(1)
        .or_else(|| env::var("DNSWATCH_CONFIG").ok())
}

fn main() -> ExitCode {
    let Some(path) = config_path() else {
        eprintln!(
            "usage: dnswatchd <config.json>  (or set DNSWATCH_CONFIG)"
        );
        return DaemonExitCode::ConfigError.into();
    };

    // Only startup configuration failures are fatal
    let config = match Config::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return DaemonExitCode::ConfigError.into();
        }
    };

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return DaemonExitCode::ConfigError.into();
    }

    info!("starting dnswatchd for {}", config.record_name);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the components and run the loop.
async fn run_daemon(config: Config) -> Result<()> {
    let resolver = HttpIpResolver::new();

    let provider = CloudflareDns::new(
        config.cloudflare_api_token.clone(),
        config.zone_id.clone(),
        config.record_name.clone(),
    );

    let notifier = TelegramNotifier::new(
        config.telegram_bot_token.clone(),
        config.telegram_chat_ids.clone(),
    );
    if notifier.is_configured() {
        info!(
            "telegram notifications enabled for {} chat(s)",
            config.telegram_chat_ids.len()
        );
    } else {
        info!("telegram notifications disabled");
    }

    let mut reconciler = Reconciler::new(
        Box::new(resolver),
        Box::new(provider),
        Box::new(notifier),
        &config,
    );

    reconciler.run().await?;
    info!("dnswatchd stopped");
    Ok(())
}
