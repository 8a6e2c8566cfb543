//! dbot: runs the demo dialog on Telegram or renders its transition graph.

use anyhow::{Context, Result};
use clap::Parser;
use dbot_cli::{build_commander, build_dialog, BotConfig, Cli, Commands};
use dbot_core::{init_tracing, BotContext};
use dbot_dialog::DEFAULT_MAX_CHAIN_DEPTH;
use dbot_telegram::{run_dispatcher, DialogApp, TelegramBotAdapter};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => run(token).await,
        Commands::Render { output } => {
            let dialog = build_dialog(DEFAULT_MAX_CHAIN_DEPTH, &[])?;
            std::fs::write(&output, dialog.to_dot())
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Wrote {}", output.display());
            Ok(())
        }
    }
}

async fn run(token: Option<String>) -> Result<()> {
    let config = BotConfig::load(token)?;
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        max_chain_depth = config.max_chain_depth,
        allowed_users = config.allowed_users.len(),
        "Starting dbot"
    );

    let bot = config.telegram.build_bot();
    let ctx = BotContext::new(Arc::new(TelegramBotAdapter::new(bot.clone())));
    let dialog = Arc::new(build_dialog(config.max_chain_depth, &config.allowed_users)?);
    let commander = Arc::new(build_commander(dialog.clone()));
    let app = Arc::new(DialogApp::new(ctx, dialog, commander));

    run_dispatcher(bot, app).await
}
