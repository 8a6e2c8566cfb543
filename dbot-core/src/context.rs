//! Explicit handle to the running bot, passed to every dialog operation and callback.

use std::sync::Arc;

use crate::bot::Bot;
use crate::memory::{EphemeralMemory, Memory};

/// Outbound bot plus the two memories. Cheap to clone.
///
/// `short_term` is cleared by the dialog engine whenever a user's session starts fresh;
/// `long_term` survives across conversations.
#[derive(Clone)]
pub struct BotContext {
    pub bot: Arc<dyn Bot>,
    pub short_term: Arc<dyn Memory>,
    pub long_term: Arc<dyn Memory>,
}

impl BotContext {
    /// Context with in-process [`EphemeralMemory`] for both memories.
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self {
            bot,
            short_term: Arc::new(EphemeralMemory::new()),
            long_term: Arc::new(EphemeralMemory::new()),
        }
    }

    pub fn with_memories(
        bot: Arc<dyn Bot>,
        short_term: Arc<dyn Memory>,
        long_term: Arc<dyn Memory>,
    ) -> Self {
        Self {
            bot,
            short_term,
            long_term,
        }
    }
}
