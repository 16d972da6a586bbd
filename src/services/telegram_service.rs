use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::multipart;
use secrecy::ExposeSecret;
use serde_json::json;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const REQUEST_TIMEOUT_SECS: u64 = 30;

static MARKDOWN_SPECIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_*`\[]").expect("MARKDOWN_SPECIALS is a valid regex pattern"));

/// Escapes the characters Telegram's Markdown parser treats specially,
/// so model-generated text cannot break message formatting.
pub fn escape_markdown(text: &str) -> String {
    MARKDOWN_SPECIALS.replace_all(text, r"\$0").to_string()
}

/// Thin client for the Telegram Bot API: all outbound delivery for the
/// webhook handler. Any non-2xx response surfaces as `BotApi`.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: format!(
                "{}/bot{}",
                TELEGRAM_API_BASE,
                config.telegram_bot_token.expose_secret()
            ),
        })
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> AppResult<()> {
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown"
        });

        let response = self
            .http
            .post(format!("{}/sendMessage", self.base_url))
            .json(&payload)
            .send()
            .await?;

        Self::check_status("sendMessage", response).await
    }

    pub async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> AppResult<()> {
        let document = multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;

        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", document);

        let response = self
            .http
            .post(format!("{}/sendDocument", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::check_status("sendDocument", response).await
    }

    /// Shows the typing indicator while an audit is running. Best-effort;
    /// callers log and ignore failures.
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> AppResult<()> {
        let payload = json!({ "chat_id": chat_id, "action": action });

        let response = self
            .http
            .post(format!("{}/sendChatAction", self.base_url))
            .json(&payload)
            .send()
            .await?;

        Self::check_status("sendChatAction", response).await
    }

    async fn check_status(method: &str, response: reqwest::Response) -> AppResult<()> {
        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::BotApi(format!(
            "{} returned {}: {}",
            method, status, body
        )))
    }
}
