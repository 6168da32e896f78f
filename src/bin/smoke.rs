//! Connectivity check: API-Football `/status` and a Telegram test message.
//! Exits non-zero if either check fails.

use std::time::Duration;

use draw_scout::config::{API_URL, TELEGRAM_API_URL};
use draw_scout::fetcher::check_api_errors;
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        ))
        .init();

    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    let (Some(api_key), Some(bot_token), Some(chat_id)) =
        (env("API_KEY"), env("BOT_TOKEN"), env("CHAT_ID"))
    else {
        error!("API_KEY, BOT_TOKEN and CHAT_ID must be set");
        std::process::exit(1);
    };
    let api_url = env("API_URL").unwrap_or_else(|| API_URL.to_string());
    let telegram_url = env("TELEGRAM_API_URL").unwrap_or_else(|| TELEGRAM_API_URL.to_string());

    let client = match reqwest::Client::builder().timeout(Duration::from_secs(20)).build() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let api_ok = match check_api(&client, &api_url, &api_key).await {
        Ok(summary) => {
            info!("[SMOKE] API-Football OK: {summary}");
            true
        }
        Err(e) => {
            error!("[SMOKE] API-Football FAILED: {e}");
            false
        }
    };

    let text = if api_ok {
        "✅ <b>Bot en línea</b>\nConexión con la API de partidos verificada."
    } else {
        "⚠️ <b>Bot en línea</b>\nLa API de partidos no responde correctamente."
    };
    let telegram_ok = match send_telegram(&client, &telegram_url, &bot_token, &chat_id, text).await {
        Ok(()) => {
            info!("[SMOKE] Telegram OK");
            true
        }
        Err(e) => {
            error!("[SMOKE] Telegram FAILED: {e}");
            false
        }
    };

    if !(api_ok && telegram_ok) {
        std::process::exit(1);
    }
}

/// Hit `/status` and summarise the account's daily quota.
async fn check_api(client: &reqwest::Client, base: &str, key: &str) -> Result<String, String> {
    let url = format!("{}/status", base.trim_end_matches('/'));
    let resp = client
        .get(&url)
        .header("x-apisports-key", key)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("HTTP {status}"));
    }
    let body: Value = resp.json().await.map_err(|e| e.to_string())?;

    check_api_errors("status", &body).map_err(|e| e.to_string())?;

    let current = body.pointer("/response/requests/current").and_then(Value::as_u64).unwrap_or(0);
    let limit = body.pointer("/response/requests/limit_day").and_then(Value::as_u64).unwrap_or(0);
    Ok(format!("requests today {current}/{limit}"))
}

async fn send_telegram(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    chat_id: &str,
    text: &str,
) -> Result<(), String> {
    let url = format!("{}/bot{}/sendMessage", base.trim_end_matches('/'), token);
    let resp = client
        .post(&url)
        .form(&[("chat_id", chat_id), ("text", text), ("parse_mode", "HTML")])
        .send()
        .await
        .map_err(|e| e.without_url().to_string())?;
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(format!("HTTP {status}: {}", body.chars().take(200).collect::<String>()))
    }
}
