//! Dispatcher: converts teloxide updates to core types and hands each one to the dialog or the
//! commander in its own task, so the update is acknowledged immediately.

use anyhow::Result;
use dbot_core::{BotContext, ToCoreMessage, ToCorePostback};
use dbot_dialog::{Commander, Dialog};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramChannelPostWrapper, TelegramMessageWrapper};

/// Everything an update handler needs; shared by all spawned tasks.
pub struct DialogApp {
    pub ctx: BotContext,
    pub dialog: Arc<Dialog>,
    pub commander: Arc<Commander>,
}

impl DialogApp {
    pub fn new(ctx: BotContext, dialog: Arc<Dialog>, commander: Arc<Commander>) -> Self {
        Self {
            ctx,
            dialog,
            commander,
        }
    }
}

/// Runs the dispatcher until Ctrl-C.
///
/// Messages go to [`Dialog::handle_message`], inline button presses to
/// [`Dialog::handle_postback`], channel posts to [`Commander::handle_echo`]. Each update is handled
/// in a spawned task; failures are logged and never stop the dispatcher.
#[instrument(skip(bot, app))]
pub async fn run_dispatcher(bot: teloxide::Bot, app: Arc<DialogApp>) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity fetched before dispatch");
        }
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback_query))
        .branch(Update::filter_channel_post().endpoint(on_channel_post));

    info!(
        commands = ?app.commander.names(),
        begin_step = %app.dialog.begin_step().name(),
        "Dispatcher starting"
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Dispatcher stopped");
    Ok(())
}

async fn on_message(msg: teloxide::types::Message, app: Arc<DialogApp>) -> ResponseResult<()> {
    let core_msg = TelegramMessageWrapper(&msg).to_core();
    info!(
        user_id = core_msg.user.id,
        chat_id = core_msg.chat.id,
        message_type = %core_msg.message_type,
        "Received message"
    );

    tokio::spawn(async move {
        if let Err(e) = app.dialog.handle_message(&app.ctx, &core_msg).await {
            if e.is_configuration() {
                error!(error = %e, user_id = core_msg.user.id, "Dialog misconfigured");
            } else {
                error!(error = %e, user_id = core_msg.user.id, "Dialog failed to handle message");
            }
        }
    });
    Ok(())
}

async fn on_callback_query(
    bot: teloxide::Bot,
    query: teloxide::types::CallbackQuery,
    app: Arc<DialogApp>,
) -> ResponseResult<()> {
    let postback = TelegramCallbackWrapper(&query).to_core();
    info!(user_id = postback.user.id, payload = %postback.payload, "Received postback");

    // Stops the button's loading spinner; the reply itself comes from the dialog.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    tokio::spawn(async move {
        if let Err(e) = app.dialog.handle_postback(&app.ctx, &postback).await {
            error!(error = %e, user_id = postback.user.id, "Dialog failed to handle postback");
        }
    });
    Ok(())
}

async fn on_channel_post(msg: teloxide::types::Message, app: Arc<DialogApp>) -> ResponseResult<()> {
    let echo = TelegramChannelPostWrapper(&msg).to_core();
    debug!(chat_id = echo.chat.id, app_id = echo.app_id, "Received echo");

    tokio::spawn(async move {
        if let Err(e) = app.commander.handle_echo(&app.ctx, &echo).await {
            error!(error = %e, chat_id = echo.chat.id, "Command failed");
        }
    });
    Ok(())
}
