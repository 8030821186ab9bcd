//! Telegram bot client for flood alerts
//!
//! Thin client over the Bot API's `sendMessage` method using the blocking
//! `ureq` agent. Alerts are rare and small, so a synchronous call with
//! bounded retries is the right shape; there is no point keeping an async
//! runtime alive for a message every fifteen minutes.
//!
//! Retries apply to transport failures, 5xx, and 429 with exponential
//! backoff. Other 4xx responses are configuration problems (bad token,
//! chat never started) that retrying cannot fix, so they fail fast with
//! an error that tells the operator what to do.

use std::thread;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Telegram-specific errors
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Chat id unknown to the bot; the recipient never messaged it
    #[error("Chat not found: start a conversation with the bot first by sending any message to it")]
    ChatNotFound,

    /// Recipient blocked the bot
    #[error("Bot was blocked by user: unblock the bot and send /start")]
    BotBlocked,

    /// Bot token rejected
    #[error("Unauthorized: check the bot token")]
    Unauthorized,

    /// Bot API rate limit exhausted after retries
    #[error("Too many requests: rate limited by the Bot API")]
    RateLimited,

    /// Any other Bot API error
    #[error("Telegram API error {code}: {description}")]
    Api {
        /// Bot API error_code
        code: u16,
        /// Bot API description
        description: String,
    },

    /// Network-level failure after retries
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload could not be serialized or the response parsed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Bad client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Telegram client configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub bot_token: String,
    /// Destination chat id
    pub chat_id: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retry attempts for transient failures
    pub max_retries: u32,
    /// Base URL, overridable for tests
    pub api_base: String,
}

impl TelegramConfig {
    /// Create a configuration for the given bot and chat
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            api_base: "https://api.telegram.org".into(),
        }
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the retry budget for transient failures
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    fn validate(&self) -> Result<(), TelegramError> {
        if self.bot_token.is_empty() {
            return Err(TelegramError::Config("bot token is empty".into()));
        }
        if self.chat_id.is_empty() {
            return Err(TelegramError::Config("chat id is empty".into()));
        }
        Ok(())
    }
}

/// `sendMessage` request body
#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Bot API response envelope
#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

/// Client for the Telegram Bot API
pub struct TelegramClient {
    config: TelegramConfig,
    agent: ureq::Agent,
}

impl TelegramClient {
    /// Create a client from configuration
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&format!("floodwatch/{}", env!("CARGO_PKG_VERSION")))
            .build();

        Ok(Self { config, agent })
    }

    /// Send a Markdown-formatted message to the configured chat
    pub fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        );
        let body = serde_json::to_string(&SendMessage {
            chat_id: &self.config.chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        })
        .map_err(|e| TelegramError::Serialization(e.to_string()))?;

        let mut last_error = TelegramError::Transport("no attempts made".into());

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(500 * (1 << attempt));
                debug!("telegram: retry {} after {:?}", attempt, delay);
                thread::sleep(delay);
            }

            let response = self
                .agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(&body);

            match response {
                Ok(resp) => {
                    let text = resp
                        .into_string()
                        .map_err(|e| TelegramError::Transport(e.to_string()))?;
                    let parsed: ApiResponse = serde_json::from_str(&text)
                        .map_err(|e| TelegramError::Serialization(e.to_string()))?;
                    if parsed.ok {
                        return Ok(());
                    }
                    // HTTP 200 with ok=false should not happen, treat as API error
                    return Err(map_api_error(
                        parsed.error_code.unwrap_or(0),
                        parsed.description.as_deref().unwrap_or(""),
                    ));
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let text = resp.into_string().unwrap_or_default();
                    let description = serde_json::from_str::<ApiResponse>(&text)
                        .ok()
                        .and_then(|r| r.description)
                        .unwrap_or(text);

                    if code >= 500 || code == 429 {
                        warn!("telegram: HTTP {} ({}), will retry", code, description);
                        last_error = if code == 429 {
                            TelegramError::RateLimited
                        } else {
                            map_api_error(code, &description)
                        };
                        continue;
                    }
                    return Err(map_api_error(code, &description));
                }
                Err(ureq::Error::Transport(e)) => {
                    warn!("telegram: transport error ({}), will retry", e);
                    last_error = TelegramError::Transport(e.to_string());
                    continue;
                }
            }
        }

        Err(last_error)
    }
}

/// Map a Bot API error code and description to a typed error
fn map_api_error(code: u16, description: &str) -> TelegramError {
    match code {
        400 if description.contains("chat not found") => TelegramError::ChatNotFound,
        400 if description.contains("bot was blocked") => TelegramError::BotBlocked,
        401 => TelegramError::Unauthorized,
        429 => TelegramError::RateLimited,
        _ => TelegramError::Api {
            code,
            description: description.to_owned(),
        },
    }
}
