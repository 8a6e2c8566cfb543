//! Commander: routes slash commands found in echoed messages to registered handlers.
//!
//! Echoes are copies of messages sent on the monitored channel. Operators type commands such as
//! `/reset 1234` in the channel; echoes produced by other apps are never treated as commands.

use async_trait::async_trait;
use dbot_core::{BotContext, Message, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// `/name` or `/name param...`; the name is lowercase ASCII letters.
static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([a-z]+)(?: (.*))?").expect("command pattern is valid"));

/// Handler for one command. `param` is the text after the command name and a single space.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &BotContext, message: &Message, param: &str) -> Result<()>;
}

/// Splits `text` into command name and parameter. Returns `("", "")` when `text` is not a command.
///
/// ```
/// use dbot_dialog::extract_command;
///
/// assert_eq!(extract_command("/help me now"), ("help", "me now"));
/// assert_eq!(extract_command("hello there"), ("", ""));
/// ```
pub fn extract_command(text: &str) -> (&str, &str) {
    match COMMAND_RE.captures(text) {
        Some(caps) => {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let param = caps.get(2).map_or("", |m| m.as_str());
            (name, param)
        }
        None => ("", ""),
    }
}

/// Command name → handler. Built once at startup, then shared read-only.
#[derive(Clone, Default)]
pub struct Commander {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl Commander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for the exact command `name`; a later registration replaces an earlier one.
    pub fn add(mut self, name: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs the handler for the command in an echoed message.
    ///
    /// Echoes with `app_id > 0` came from another app and are ignored. Text that is not a command,
    /// or names a command nobody registered, is ignored too.
    #[instrument(skip_all, fields(user_id = echo.user.id, app_id = echo.app_id))]
    pub async fn handle_echo(&self, ctx: &BotContext, echo: &Message) -> Result<()> {
        if echo.app_id > 0 {
            debug!("echo from another app ignored");
            return Ok(());
        }

        let (name, param) = extract_command(&echo.content);
        if name.is_empty() {
            return Ok(());
        }
        match self.handlers.get(name) {
            Some(handler) => {
                info!(command = %name, param = %param, "command dispatched");
                handler.handle(ctx, echo, param).await
            }
            None => {
                debug!(command = %name, "unknown command ignored");
                Ok(())
            }
        }
    }
}
