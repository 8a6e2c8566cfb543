//! # dbot-dialog
//!
//! Conversational-session engine for dbot. A [`Dialog`] tracks which [`Step`] each user is on and
//! turns the [`Event`]s that steps emit into transitions, following point-to-point edges first and
//! global edges as fallback, and cascading through steps until no further transition applies.
//! [`Commander`] routes slash commands found in echoed messages.
//!
//! ```no_run
//! use std::sync::Arc;
//! use dbot_dialog::{Dialog, NoOpStep, Step};
//!
//! let ask_name: Arc<dyn Step> = Arc::new(NoOpStep::new("ask_name"));
//! let ask_age: Arc<dyn Step> = Arc::new(NoOpStep::new("ask_age"));
//! let done: Arc<dyn Step> = Arc::new(NoOpStep::new("done"));
//!
//! let dialog = Dialog::builder()
//!     .begin_step(ask_name.clone())
//!     .end_step(done.clone())
//!     .add_transition("got_name", [ask_name, ask_age.clone()])
//!     .add_transition("got_age", [ask_age, done])
//!     .build()
//!     .expect("dialog is configured");
//! ```

mod builder;
mod commander;
mod dialog;
mod error;
mod event;
mod hook;
mod render;
mod session;
mod step;

pub use builder::{DialogBuilder, DEFAULT_MAX_CHAIN_DEPTH};
pub use commander::{extract_command, CommandHandler, Commander};
pub use dialog::Dialog;
pub use error::{DialogError, Result};
pub use event::Event;
pub use hook::{AllowlistHook, DialogHook, LoggingHook};
pub use step::{NoOpStep, Step};
