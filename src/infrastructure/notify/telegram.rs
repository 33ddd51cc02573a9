use crate::domain::models::NotifyConfig;
use crate::domain::ports::errors::NotifyError;
use crate::domain::ports::Notifier;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Telegram Bot API notifier. One destination per send; the dispatcher
/// owns the fan-out.
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
}

impl TelegramNotifier {
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        if config.bot_token.is_empty() {
            return Err(NotifyError::NotConfigured(
                "notify.bot_token is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let body = json!({
            "chat_id": destination,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::SendFailed {
                destination: destination.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NotifyError::SendFailed {
                destination: destination.to_string(),
                reason: format!("status {status}: {detail}"),
            });
        }

        debug!(destination, "notification delivered");
        Ok(())
    }
}
