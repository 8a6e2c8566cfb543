//! Core types: user, chat, message, postback, and the transport conversion traits.

mod adapter;
mod chat;
mod message;
mod postback;
mod user;

pub use adapter::{ToCoreMessage, ToCorePostback, ToCoreUser};
pub use chat::Chat;
pub use message::{Attachment, AttachmentKind, Message, MessageDirection};
pub use postback::Postback;
pub use user::User;
