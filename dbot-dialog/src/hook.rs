//! Cross-cutting hooks run around message and postback handling.
//!
//! Hooks run like middleware: every `before_*` in registration order, then the dialog, then every
//! `after_*` in reverse order. A `before_*` returning `false` short-circuits the event: nothing else
//! runs for it, including the `after_*` hooks, and the caller sees `Ok(())`.

use async_trait::async_trait;
use dbot_core::{BotContext, Message, Postback, Result};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

#[async_trait]
pub trait DialogHook: Send + Sync {
    /// Runs before a message reaches the dialog. Return false to drop the message.
    async fn before_message(&self, _ctx: &BotContext, _message: &Message) -> Result<bool> {
        Ok(true)
    }

    async fn after_message(&self, _ctx: &BotContext, _message: &Message) -> Result<()> {
        Ok(())
    }

    /// Runs before a postback is turned into a message. Return false to drop the postback.
    async fn before_postback(&self, _ctx: &BotContext, _postback: &Postback) -> Result<bool> {
        Ok(true)
    }

    async fn after_postback(&self, _ctx: &BotContext, _postback: &Postback) -> Result<()> {
        Ok(())
    }
}

/// Logs every message and postback; never short-circuits.
pub struct LoggingHook;

#[async_trait]
impl DialogHook for LoggingHook {
    #[instrument(skip(self, _ctx, message))]
    async fn before_message(&self, _ctx: &BotContext, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            message_type = %message.message_type,
            message_content = %message.content,
            attachments = message.attachments.len(),
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, _ctx, message))]
    async fn after_message(&self, _ctx: &BotContext, message: &Message) -> Result<()> {
        debug!(user_id = message.user.id, message_id = %message.id, "Processed message");
        Ok(())
    }

    #[instrument(skip(self, _ctx, postback))]
    async fn before_postback(&self, _ctx: &BotContext, postback: &Postback) -> Result<bool> {
        info!(
            user_id = postback.user.id,
            payload = %postback.payload,
            "Received postback"
        );
        Ok(true)
    }
}

/// Drops events from users that are not on the allowlist.
pub struct AllowlistHook {
    allowed_users: HashSet<i64>,
}

impl AllowlistHook {
    /// Creates a hook that lets through only the given user ids.
    pub fn new(allowed_users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allowed_users: allowed_users.into_iter().collect(),
        }
    }

    fn allows(&self, user_id: i64) -> bool {
        let allowed = self.allowed_users.contains(&user_id);
        if !allowed {
            warn!(user_id = user_id, "Event from user outside allowlist dropped");
        }
        allowed
    }
}

#[async_trait]
impl DialogHook for AllowlistHook {
    async fn before_message(&self, _ctx: &BotContext, message: &Message) -> Result<bool> {
        Ok(self.allows(message.user.id))
    }

    async fn before_postback(&self, _ctx: &BotContext, postback: &Postback) -> Result<bool> {
        Ok(self.allows(postback.user.id))
    }
}
