// # Telegram Notifier
//
// Best-effort operator notifications via the Telegram Bot API.
//
// One `sendMessage` call per configured chat, each delivery independent of
// the others. Failures are logged and swallowed — a broken notification
// channel must never affect the reconciliation outcome. Without a bot
// token or with an empty chat list the notifier is a silent no-op and
// performs zero network calls.

use async_trait::async_trait;
use dnswatch_core::traits::Notifier;
use std::time::Duration;
use tracing::{debug, error, info};

/// Telegram Bot API base URL
const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Timeout for sendMessage calls
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram fan-out notifier.
pub struct TelegramNotifier {
    /// Bot token; `None` disables the notifier entirely
    bot_token: Option<String>,

    /// Chats to deliver to; empty disables the notifier entirely
    chat_ids: Vec<i64>,

    /// API base URL, overridable for tests
    base_url: String,

    client: reqwest::Client,
}

// The bot token stays out of Debug output
impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<REDACTED>"))
            .field("chat_ids", &self.chat_ids)
            .finish()
    }
}

impl TelegramNotifier {
    /// Create a notifier; pass `None` or an empty chat list to disable it.
    pub fn new(bot_token: Option<String>, chat_ids: Vec<i64>) -> Self {
        Self::with_base_url(bot_token, chat_ids, TELEGRAM_API_BASE)
    }

    /// Create a notifier against a custom API base URL, mainly for tests.
    pub fn with_base_url(
        bot_token: Option<String>,
        chat_ids: Vec<i64>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            bot_token,
            chat_ids,
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Whether notifications will actually be sent.
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && !self.chat_ids.is_empty()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) {
        let Some(token) = &self.bot_token else {
            debug!("telegram not configured, skipping notification");
            return;
        };
        if self.chat_ids.is_empty() {
            debug!("no telegram chats configured, skipping notification");
            return;
        }

        let url = format!("{}/bot{}/sendMessage", self.base_url, token);

        for chat_id in &self.chat_ids {
            let payload = serde_json::json!({
                "chat_id": chat_id,
                "text": message,
            });

            match self.client.post(&url).json(&payload).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("telegram notification sent to chat {}", chat_id);
                }
                Ok(response) => {
                    error!(
                        "telegram delivery to chat {} failed: {}",
                        chat_id,
                        response.status()
                    );
                }
                Err(e) => {
                    error!("telegram delivery to chat {} failed: {}", chat_id, e);
                }
            }
        }
    }
}
