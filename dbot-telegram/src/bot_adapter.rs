//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code sends through Telegram;
//! tests substitute another Bot impl.

use async_trait::async_trait;
use dbot_core::{Bot as CoreBot, Chat, Choice, DbotError, Message, Result};
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup};

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

/// One button per row; pressing a button sends its payload back as callback data.
pub(crate) fn keyboard(choices: &[Choice]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(choices.iter().map(|choice| {
        vec![InlineKeyboardButton::callback(
            choice.label.clone(),
            choice.payload.clone(),
        )]
    }))
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_choices(&self, chat: &Chat, text: &str, choices: &[Choice]) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(keyboard(choices))
            .await
            .map_err(|e| DbotError::Bot(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_new() {
        let adapter = TelegramBotAdapter::new(teloxide::Bot::new("dummy_token"));
        assert_eq!(adapter.inner().token(), "dummy_token");
    }

    #[test]
    fn test_keyboard_has_one_row_per_choice() {
        let markup = keyboard(&[Choice::new("Yes", "yes"), Choice::new("No", "no")]);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));
        assert_eq!(markup.inline_keyboard[0][0].text, "Yes");
    }
}
