//! Error types for the bot core.
//!
//! [`DbotError`] is the top-level error; [`HandlerError`] is used by steps, hooks and command handlers.

use thiserror::Error;

/// Top-level error for dbot: transport failures and handler failures.
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Errors produced by steps, hooks and command handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Empty content")]
    EmptyContent,
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;
