//! Message, direction and attachment types for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// Direction of the message (from user or from bot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

/// Kind of media carried by an [`Attachment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    File,
}

/// Media attached to a message. `url` is transport-specific (a URL or a file id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub url: String,
}

/// A single inbound or echoed message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub message_type: String,
    pub direction: MessageDirection,
    pub created_at: DateTime<Utc>,
    /// True when this is a notification that a message was sent on the monitored channel.
    pub is_echo: bool,
    /// App that produced an echo; 0 means this integration or a human operator.
    pub app_id: i64,
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Incoming text message with a fresh timestamp and no attachments.
    pub fn incoming(id: impl Into<String>, user: User, chat: Chat, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user,
            chat,
            content: content.into(),
            message_type: "text".to_string(),
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
            is_echo: false,
            app_id: 0,
            attachments: Vec::new(),
        }
    }

    /// Trimmed text content; empty when the message carries only media.
    pub fn text(&self) -> &str {
        self.content.trim()
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
