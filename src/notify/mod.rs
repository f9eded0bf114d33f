pub mod telegram;

use async_trait::async_trait;

use crate::error::NotificationError;

pub use telegram::TelegramNotifier;

/// Posts a human-readable message to the alert channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotificationError>;
}
