//! Step: a named unit of conversation behavior with enter / process / leave callbacks.

use async_trait::async_trait;
use dbot_core::{BotContext, Message, Result};

use crate::event::Event;

/// One node of a dialog. Steps are built once at configuration time and shared read-only by every
/// user's session, so per-user data belongs in [`BotContext`] memory, not in the step.
///
/// All callbacks default to returning [`Event::NIL`]; implement only the ones you need.
#[async_trait]
pub trait Step: Send + Sync {
    /// Name used as the step's identity in transition tables. Must be unique within a dialog.
    fn name(&self) -> &str;

    /// Called when the session moves onto this step (or starts on the begin step).
    async fn enter(&self, _ctx: &BotContext, _message: &Message) -> Result<Event> {
        Ok(Event::NIL)
    }

    /// Called for each inbound message while the session sits on this step.
    async fn process(&self, _ctx: &BotContext, _message: &Message) -> Result<Event> {
        Ok(Event::NIL)
    }

    /// Called when a transition moves the session off this step. The returned event is ignored.
    async fn leave(&self, _ctx: &BotContext, _message: &Message) -> Result<Event> {
        Ok(Event::NIL)
    }
}

/// Step that does nothing; handy for end steps and placeholders.
#[derive(Debug, Clone)]
pub struct NoOpStep {
    name: String,
}

impl NoOpStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Step for NoOpStep {
    fn name(&self) -> &str {
        &self.name
    }
}
