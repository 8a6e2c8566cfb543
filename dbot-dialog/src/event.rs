//! Events emitted by step callbacks to select the next transition.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Opaque transition signal. Two values are reserved: [`Event::NIL`] (no signal, no transition is
/// attempted) and [`Event::RESET`] (end the session immediately, bypassing the transition tables).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Event(Cow<'static, str>);

impl Event {
    pub const NIL: Event = Event(Cow::Borrowed(""));
    pub const RESET: Event = Event(Cow::Borrowed("reset"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_reset(&self) -> bool {
        *self == Self::RESET
    }

    /// Nil or Reset; neither can key a transition.
    pub fn is_reserved(&self) -> bool {
        self.is_nil() || self.is_reset()
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::NIL
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("<nil>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&'static str> for Event {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}
