//! Telegram Bot API delivery (`sendMessage`, HTML parse mode).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::notifier::Notifier;

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

impl TelegramNotifier {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: cfg.telegram_api_url.trim_end_matches('/').to_string(),
            bot_token: cfg.bot_token.clone(),
            chat_id: cfg.chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);
        let form = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        // reqwest errors embed the URL, which carries the bot token.
        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Notify(format!("request failed: {}", e.without_url())))?;

        let status = resp.status();
        if status.is_success() {
            debug!("Telegram message delivered to chat {}", self.chat_id);
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            error!("Telegram sendMessage failed: {status} - {excerpt}");
            Err(AppError::Notify(format!("HTTP {status}: {excerpt}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{closed_port_url, config, serve_once};

    #[tokio::test]
    async fn posts_html_form_to_send_message() {
        let (url, server) = serve_once("200 OK", r#"{"ok":true,"result":{}}"#.to_string()).await;
        let notifier = TelegramNotifier::new(&config(&[("TELEGRAM_API_URL", url.as_str())])).unwrap();

        notifier.send("⚽ <b>hola</b>").await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /bot123456:SECRET-TOKEN/sendMessage "));
        assert!(request.contains("chat_id=42"));
        assert!(request.contains("parse_mode=HTML"));
    }

    #[tokio::test]
    async fn unauthorized_reply_is_a_notify_error() {
        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#.to_string();
        let (url, server) = serve_once("401 Unauthorized", body).await;
        let notifier = TelegramNotifier::new(&config(&[("TELEGRAM_API_URL", url.as_str())])).unwrap();

        let err = notifier.send("test").await.unwrap_err();
        server.await.unwrap();
        assert!(matches!(err, AppError::Notify(_)));
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Unauthorized"));
    }

    #[tokio::test]
    async fn error_body_is_truncated() {
        let (url, server) = serve_once("500 Internal Server Error", "x".repeat(500)).await;
        let notifier = TelegramNotifier::new(&config(&[("TELEGRAM_API_URL", url.as_str())])).unwrap();

        let msg = notifier.send("test").await.unwrap_err().to_string();
        server.await.unwrap();
        assert!(msg.contains(&"x".repeat(200)));
        assert!(!msg.contains(&"x".repeat(201)));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_token() {
        let url = closed_port_url().await;
        let notifier = TelegramNotifier::new(&config(&[("TELEGRAM_API_URL", url.as_str())])).unwrap();

        let err = notifier.send("test").await.unwrap_err();
        assert!(matches!(err, AppError::Notify(_)));
        assert!(!err.to_string().contains("SECRET-TOKEN"));
    }
}
