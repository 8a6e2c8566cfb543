//! Dialog errors: configuration problems found by the builder and failures while handling events.

use dbot_core::DbotError;
use thiserror::Error;

use crate::event::Event;

#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Begin step is not set")]
    MissingBeginStep,

    #[error("End step is not set")]
    MissingEndStep,

    #[error("Begin and end step are the same step: {0}")]
    BeginIsEnd(String),

    #[error("Transition for event '{0}' has no steps")]
    EmptyTransition(Event),

    #[error("Event '{0}' is reserved and cannot key a transition")]
    ReservedEvent(Event),

    #[error("Two different steps are registered under the name '{0}'")]
    DuplicateStep(String),

    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("Transition chain for user {user_id} exceeded {limit} steps (last step: {step})")]
    TransitionLimitExceeded {
        user_id: i64,
        limit: usize,
        step: String,
    },

    #[error("Step error: {0}")]
    Step(#[from] DbotError),
}

impl DialogError {
    /// True for errors that come from how the dialog was set up. Step callback failures and
    /// unknown step names passed to [`crate::Dialog::move_to`] are not.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DialogError::Step(_) | DialogError::UnknownStep(_))
    }
}

pub type Result<T> = std::result::Result<T, DialogError>;
