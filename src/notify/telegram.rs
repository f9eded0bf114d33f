use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::error::NotificationError;

use super::Notifier;

/// Sends alerts as plain-text messages to one Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map(|_| ())
            .map_err(|e| NotificationError::Delivery(e.to_string()))
    }
}
