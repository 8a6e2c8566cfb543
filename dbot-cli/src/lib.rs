//! dbot CLI library: argument parsing, config loading and the demo dialog.

pub mod cli;
pub mod config;
pub mod demo;

pub use cli::{Cli, Commands};
pub use config::BotConfig;
pub use demo::{build_commander, build_dialog};
