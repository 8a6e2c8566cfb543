//! Bot abstraction for outbound replies.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in dbot-telegram. Steps and
//! command handlers reach it through [`crate::BotContext`] and own the handling of its failures.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A button offered to the user. Pressing it delivers `payload` back as a postback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub payload: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Abstraction for sending messages. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Sends text with one button per choice.
    async fn send_choices(&self, chat: &Chat, text: &str, choices: &[Choice]) -> Result<()>;
}
