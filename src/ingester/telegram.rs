//! Telegram Bot API source
//!
//! Long-polls `getUpdates` and forwards the text of group messages and
//! channel posts. Bot commands are skipped; when a chat id is configured,
//! messages from any other chat are dropped.

use super::{MessageSource, RawMessage};
use crate::config::TelegramConfig;
use crate::error::{Result, SignalError};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
struct GetUpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<TelegramUpdate>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramUpdate {
    update_id: i64,
    message: Option<TelegramMessage>,
    channel_post: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
struct TelegramMessage {
    message_id: i64,
    chat: TelegramChat,
    date: Option<i64>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramChat {
    id: i64,
}

pub struct TelegramBotSource {
    config: TelegramConfig,
    http: Client,
}

impl TelegramBotSource {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn poll_updates(&self, offset: i64) -> Result<Vec<TelegramUpdate>> {
        let url = format!(
            "https://api.telegram.org/bot{}/getUpdates?offset={}&timeout={}",
            self.config.bot_token, offset, self.config.poll_timeout_secs
        );

        let response: GetUpdatesResponse = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(self.config.poll_timeout_secs + 10))
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(SignalError::Api(
                response
                    .description
                    .unwrap_or_else(|| "getUpdates returned ok=false".to_string()),
            ));
        }
        Ok(response.result)
    }

    /// Turn one update into a raw message, applying the chat filter.
    fn to_raw_message(&self, update: TelegramUpdate) -> Option<RawMessage> {
        let msg = match (update.message, update.channel_post) {
            (Some(msg), _) => msg,
            (None, Some(post)) if self.config.include_channel_posts => post,
            _ => return None,
        };

        let chat_id = msg.chat.id.to_string();
        if let Some(allowed) = &self.config.chat_id {
            if *allowed != chat_id {
                return None;
            }
        }

        let text = msg.text?;
        if text.starts_with('/') {
            return None;
        }

        let received_at = msg
            .date
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .unwrap_or_else(Utc::now);

        Some(RawMessage {
            source: "telegram".to_string(),
            source_id: format!("{}:{}", chat_id, msg.message_id),
            chat_id: Some(chat_id),
            text,
            received_at,
        })
    }
}

#[async_trait]
impl MessageSource for TelegramBotSource {
    fn name(&self) -> &str {
        "telegram_bot"
    }

    async fn run(&self, tx: mpsc::Sender<RawMessage>) -> Result<()> {
        tracing::info!(
            chat_id = self.config.chat_id.as_deref().unwrap_or("*"),
            "Telegram bot source listening for messages"
        );

        let mut offset: i64 = 0;
        loop {
            match self.poll_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(raw) = self.to_raw_message(update) else {
                            continue;
                        };
                        if tx.send(raw).await.is_err() {
                            tracing::warn!("Message channel closed, stopping Telegram source");
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to poll Telegram updates: {}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }
}
