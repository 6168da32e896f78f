pub mod message;
pub mod telegram;

use async_trait::async_trait;

use crate::error::Result;

pub use telegram::TelegramNotifier;

/// Delivery of one formatted text payload. Not retried.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}
