//! # dbot-core
//!
//! Core types and traits shared by the dialog engine and transports: [`Bot`], [`Memory`],
//! [`BotContext`], message/postback/user types, errors, and tracing initialization.

pub mod bot;
pub mod context;
pub mod error;
pub mod logger;
pub mod memory;
pub mod types;

pub use bot::{Bot, Choice};
pub use context::BotContext;
pub use error::{DbotError, HandlerError, Result};
pub use logger::init_tracing;
pub use memory::{EphemeralMemory, Memory};
pub use types::{
    Attachment, AttachmentKind, Chat, Message, MessageDirection, Postback, ToCoreMessage,
    ToCorePostback, ToCoreUser, User,
};
