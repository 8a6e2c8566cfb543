//! Telegram update → core type converters.

use chrono::Utc;
use dbot_core::{
    Attachment, AttachmentKind, Chat, Message, MessageDirection, Postback, ToCoreMessage,
    ToCorePostback, ToCoreUser, User,
};

/// Telegram user → core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Private or group message → core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let user = msg
            .from
            .as_ref()
            .map(|u| TelegramUserWrapper(u).to_core())
            .unwrap_or_else(|| User::with_id(msg.chat.id.0));
        Message {
            id: msg.id.to_string(),
            user,
            chat: chat_of(msg),
            content: content_of(msg),
            message_type: message_type_of(msg).to_string(),
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
            is_echo: false,
            app_id: 0,
            attachments: attachments_of(msg),
        }
    }
}

/// Channel post → echo [`Message`].
///
/// A channel post is a message sent on the monitored channel by its operators. When it was sent
/// through an inline bot, that bot's id becomes `app_id`; otherwise `app_id` is 0.
pub struct TelegramChannelPostWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramChannelPostWrapper<'a> {
    fn to_core(&self) -> Message {
        let mut message = TelegramMessageWrapper(self.0).to_core();
        message.is_echo = true;
        message.direction = MessageDirection::Outgoing;
        message.app_id = self.0.via_bot.as_ref().map_or(0, |bot| bot.id.0 as i64);
        message
    }
}

/// Inline keyboard button press → core [`Postback`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> ToCorePostback for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Postback {
        let query = self.0;
        let user = TelegramUserWrapper(&query.from).to_core();
        let chat = query
            .message
            .as_ref()
            .map(|m| Chat {
                id: m.chat().id.0,
                chat_type: format!("{:?}", m.chat().kind),
            })
            .unwrap_or_else(|| Chat::private(user.id));
        Postback {
            id: query.id.to_string(),
            user,
            chat,
            payload: query.data.clone().unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

fn chat_of(msg: &teloxide::types::Message) -> Chat {
    Chat {
        id: msg.chat.id.0,
        chat_type: format!("{:?}", msg.chat.kind),
    }
}

fn content_of(msg: &teloxide::types::Message) -> String {
    msg.text()
        .or_else(|| msg.caption())
        .unwrap_or("")
        .to_string()
}

fn message_type_of(msg: &teloxide::types::Message) -> &'static str {
    if msg.text().is_some() {
        "text"
    } else if msg.photo().is_some() {
        "photo"
    } else if msg.video().is_some() {
        "video"
    } else if msg.audio().is_some() || msg.voice().is_some() {
        "audio"
    } else if msg.document().is_some() {
        "document"
    } else {
        "other"
    }
}

fn attachments_of(msg: &teloxide::types::Message) -> Vec<Attachment> {
    let mut attachments = Vec::new();
    if let Some(largest) = msg.photo().and_then(|sizes| sizes.last()) {
        attachments.push(Attachment {
            kind: AttachmentKind::Image,
            url: largest.file.id.to_string(),
        });
    }
    if let Some(video) = msg.video() {
        attachments.push(Attachment {
            kind: AttachmentKind::Video,
            url: video.file.id.to_string(),
        });
    }
    if let Some(audio) = msg.audio() {
        attachments.push(Attachment {
            kind: AttachmentKind::Audio,
            url: audio.file.id.to_string(),
        });
    }
    if let Some(voice) = msg.voice() {
        attachments.push(Attachment {
            kind: AttachmentKind::Audio,
            url: voice.file.id.to_string(),
        });
    }
    if let Some(document) = msg.document() {
        attachments.push(Attachment {
            kind: AttachmentKind::File,
            url: document.file.id.to_string(),
        });
    }
    attachments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
        assert_eq!(core_user.display_name().as_deref(), Some("Test User"));
    }

    #[test]
    fn test_telegram_user_wrapper_minimal() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(456),
            is_bot: false,
            first_name: "Minimal".to_string(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 456);
        assert_eq!(core_user.username, None);
        assert_eq!(core_user.first_name, Some("Minimal".to_string()));
        assert_eq!(core_user.last_name, None);
    }
}
