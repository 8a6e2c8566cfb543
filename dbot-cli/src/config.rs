//! Bot config: Telegram connection, logging and dialog limits. Loaded from env.

use anyhow::{Context, Result};
use dbot_dialog::DEFAULT_MAX_CHAIN_DEPTH;
use dbot_telegram::TelegramConfig;
use std::env;

/// Full config for `dbot run`.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram: TelegramConfig,
    /// LOG_FILE
    pub log_file: String,
    /// DIALOG_MAX_CHAIN_DEPTH: longest cascade of transitions one event may trigger
    pub max_chain_depth: usize,
    /// ALLOWED_USERS: comma-separated user ids; empty means everyone
    pub allowed_users: Vec<i64>,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::load(token)?;
        let log_file = telegram
            .log_file
            .clone()
            .unwrap_or_else(|| "logs/dbot.log".to_string());
        let max_chain_depth = match env::var("DIALOG_MAX_CHAIN_DEPTH") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DIALOG_MAX_CHAIN_DEPTH is not a number: {}", raw))?,
            Err(_) => DEFAULT_MAX_CHAIN_DEPTH,
        };
        let allowed_users = match env::var("ALLOWED_USERS") {
            Ok(raw) => parse_user_ids(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            telegram,
            log_file,
            max_chain_depth,
            allowed_users,
        })
    }

    /// Validate config (API URL format, positive chain depth).
    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        if self.max_chain_depth == 0 {
            anyhow::bail!("DIALOG_MAX_CHAIN_DEPTH must be at least 1");
        }
        Ok(())
    }
}

fn parse_user_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .with_context(|| format!("ALLOWED_USERS contains an invalid user id: {}", s))
        })
        .collect()
}
