//! Postback: a button press delivered back to the bot with the button's payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    chat::Chat,
    message::{Message, MessageDirection},
    user::User,
};

/// Button press from a user. `payload` is whatever the bot attached to the button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Postback {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl Postback {
    pub fn new(id: impl Into<String>, user: User, chat: Chat, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user,
            chat,
            payload: payload.into(),
            created_at: Utc::now(),
        }
    }

    /// Message-shaped view of the postback: same sender, text is the payload.
    pub fn to_message(&self) -> Message {
        Message {
            id: self.id.clone(),
            user: self.user.clone(),
            chat: self.chat.clone(),
            content: self.payload.clone(),
            message_type: "postback".to_string(),
            direction: MessageDirection::Incoming,
            created_at: self.created_at,
            is_echo: false,
            app_id: 0,
            attachments: Vec::new(),
        }
    }
}
