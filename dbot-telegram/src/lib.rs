//! # dbot-telegram
//!
//! Telegram transport for dbot dialogs: update adapters, [`dbot_core::Bot`] implementation, minimal
//! config, and a dispatcher that hands messages and button presses to a [`dbot_dialog::Dialog`]
//! and channel posts to a [`dbot_dialog::Commander`].

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{
    TelegramCallbackWrapper, TelegramChannelPostWrapper, TelegramMessageWrapper,
    TelegramUserWrapper,
};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{run_dispatcher, DialogApp};
