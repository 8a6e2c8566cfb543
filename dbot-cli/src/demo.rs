//! Demo sign-up dialog and operator commands served by `dbot run`.
//!
//! ask_name → ask_age → confirm → goodbye. "no" at confirm goes back to ask_name; "start over"
//! anywhere jumps back to ask_name; "cancel" anywhere ends the session.

use async_trait::async_trait;
use dbot_core::{BotContext, Chat, Choice, DbotError, HandlerError, Message, Result, User};
use dbot_dialog::{
    AllowlistHook, CommandHandler, Commander, Dialog, DialogHook, Event, LoggingHook, Step,
};
use std::sync::Arc;
use tracing::info;

pub const ASK_NAME: &str = "ask_name";
pub const ASK_AGE: &str = "ask_age";
pub const CONFIRM: &str = "confirm";
pub const GOODBYE: &str = "goodbye";

pub const GOT_NAME: &str = "got_name";
pub const GOT_AGE: &str = "got_age";
pub const CONFIRMED: &str = "confirmed";
pub const REJECTED: &str = "rejected";
pub const START_OVER: &str = "start_over";

const NAME_KEY: &str = "name";
const AGE_KEY: &str = "age";

/// Words that work on every step.
fn control_event(text: &str) -> Option<Event> {
    match text.to_lowercase().as_str() {
        "cancel" => Some(Event::RESET),
        "start over" => Some(Event::from(START_OVER)),
        _ => None,
    }
}

async fn remembered(ctx: &BotContext, user_id: i64, key: &str) -> Result<String> {
    Ok(ctx
        .short_term
        .get(user_id, key)
        .await?
        .unwrap_or_else(|| "friend".to_string()))
}

pub struct AskName;

#[async_trait]
impl Step for AskName {
    fn name(&self) -> &str {
        ASK_NAME
    }

    async fn enter(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        ctx.bot.reply_to(message, "Hi! What's your name?").await?;
        Ok(Event::NIL)
    }

    async fn process(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        let text = message.text();
        if let Some(event) = control_event(text) {
            return Ok(event);
        }
        if text.is_empty() {
            ctx.bot.reply_to(message, "Please tell me your name.").await?;
            return Ok(Event::NIL);
        }
        ctx.short_term.set(message.user.id, NAME_KEY, text).await?;
        Ok(Event::from(GOT_NAME))
    }
}

pub struct AskAge;

#[async_trait]
impl Step for AskAge {
    fn name(&self) -> &str {
        ASK_AGE
    }

    async fn enter(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        let name = remembered(ctx, message.user.id, NAME_KEY).await?;
        ctx.bot
            .reply_to(message, &format!("Nice to meet you, {}! How old are you?", name))
            .await?;
        Ok(Event::NIL)
    }

    async fn process(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        let text = message.text();
        if let Some(event) = control_event(text) {
            return Ok(event);
        }
        match text.parse::<u8>() {
            Ok(age) if (1..=130).contains(&age) => {
                ctx.short_term
                    .set(message.user.id, AGE_KEY, &age.to_string())
                    .await?;
                Ok(Event::from(GOT_AGE))
            }
            _ => {
                ctx.bot
                    .reply_to(message, "Please send your age as a number.")
                    .await?;
                Ok(Event::NIL)
            }
        }
    }
}

pub struct Confirm;

impl Confirm {
    fn choices() -> [Choice; 2] {
        [Choice::new("Yes", "yes"), Choice::new("No", "no")]
    }
}

#[async_trait]
impl Step for Confirm {
    fn name(&self) -> &str {
        CONFIRM
    }

    async fn enter(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        let name = remembered(ctx, message.user.id, NAME_KEY).await?;
        let age = remembered(ctx, message.user.id, AGE_KEY).await?;
        ctx.bot
            .send_choices(
                &message.chat,
                &format!("So you are {}, {} years old. Is that right?", name, age),
                &Self::choices(),
            )
            .await?;
        Ok(Event::NIL)
    }

    async fn process(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        let text = message.text();
        if let Some(event) = control_event(text) {
            return Ok(event);
        }
        match text.to_lowercase().as_str() {
            "yes" => Ok(Event::from(CONFIRMED)),
            "no" => Ok(Event::from(REJECTED)),
            _ => {
                ctx.bot
                    .send_choices(&message.chat, "Please press Yes or No.", &Self::choices())
                    .await?;
                Ok(Event::NIL)
            }
        }
    }
}

pub struct Goodbye;

#[async_trait]
impl Step for Goodbye {
    fn name(&self) -> &str {
        GOODBYE
    }

    async fn enter(&self, ctx: &BotContext, message: &Message) -> Result<Event> {
        let name = remembered(ctx, message.user.id, NAME_KEY).await?;
        ctx.long_term.set(message.user.id, NAME_KEY, &name).await?;
        ctx.bot
            .reply_to(
                message,
                &format!("Thanks, {}! Send any message to start again.", name),
            )
            .await?;
        Ok(Event::NIL)
    }
}

/// Builds the demo dialog. `allowed_users` enables the allowlist when not empty.
pub fn build_dialog(max_chain_depth: usize, allowed_users: &[i64]) -> dbot_dialog::Result<Dialog> {
    let ask_name: Arc<dyn Step> = Arc::new(AskName);
    let ask_age: Arc<dyn Step> = Arc::new(AskAge);
    let confirm: Arc<dyn Step> = Arc::new(Confirm);
    let goodbye: Arc<dyn Step> = Arc::new(Goodbye);

    let mut builder = Dialog::builder()
        .begin_step(ask_name.clone())
        .end_step(goodbye.clone())
        .add_transition(GOT_NAME, [ask_name.clone(), ask_age.clone()])
        .add_transition(GOT_AGE, [ask_age, confirm.clone()])
        .add_transition(CONFIRMED, [confirm.clone(), goodbye])
        .add_transition(REJECTED, [confirm, ask_name.clone()])
        .add_transition(START_OVER, [ask_name])
        .max_chain_depth(max_chain_depth)
        .hook(Arc::new(LoggingHook));
    if !allowed_users.is_empty() {
        let allowlist: Arc<dyn DialogHook> =
            Arc::new(AllowlistHook::new(allowed_users.iter().copied()));
        builder = builder.hook(allowlist);
    }
    builder.build()
}

fn parse_user_id(param: &str) -> Result<i64> {
    let Some(raw) = param.split_whitespace().next() else {
        return Err(HandlerError::EmptyContent.into());
    };
    raw.parse().map_err(|_| {
        DbotError::from(HandlerError::InvalidCommand(format!(
            "expected a user id, got '{}'",
            param
        )))
    })
}

/// `/help`: lists the operator commands in the channel.
pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, ctx: &BotContext, message: &Message, _param: &str) -> Result<()> {
        ctx.bot
            .send_message(
                &message.chat,
                "/help - this list\n/reset <user_id> - end a user's dialog\n/move <user_id> [step] - move a user to a step (default: start over)",
            )
            .await
    }
}

/// `/reset <user_id>`: deletes the user's session.
pub struct ResetCommand {
    dialog: Arc<Dialog>,
}

#[async_trait]
impl CommandHandler for ResetCommand {
    async fn handle(&self, ctx: &BotContext, message: &Message, param: &str) -> Result<()> {
        let user_id = parse_user_id(param)?;
        let existed = self.dialog.reset(user_id).await;
        info!(user_id = user_id, existed = existed, "operator reset");
        let reply = if existed {
            format!("Session of {} reset.", user_id)
        } else {
            format!("{} has no session.", user_id)
        };
        ctx.bot.send_message(&message.chat, &reply).await
    }
}

/// `/move <user_id> [step]`: moves the user to a step outside the normal flow.
pub struct MoveCommand {
    dialog: Arc<Dialog>,
}

#[async_trait]
impl CommandHandler for MoveCommand {
    async fn handle(&self, ctx: &BotContext, message: &Message, param: &str) -> Result<()> {
        let user_id = parse_user_id(param)?;
        let step = param.split_whitespace().nth(1);
        let target = Message::incoming(
            message.id.clone(),
            User::with_id(user_id),
            Chat::private(user_id),
            "",
        );
        self.dialog
            .move_to(ctx, &target, step)
            .await
            .map_err(|e| HandlerError::State(e.to_string()))?;
        let now_on = self
            .dialog
            .current_step(user_id)
            .unwrap_or_else(|| "-".to_string());
        ctx.bot
            .send_message(&message.chat, &format!("{} is now on {}.", user_id, now_on))
            .await
    }
}

/// Operator commands for the demo dialog.
pub fn build_commander(dialog: Arc<Dialog>) -> Commander {
    Commander::new()
        .add("help", Arc::new(HelpCommand))
        .add("reset", Arc::new(ResetCommand { dialog: dialog.clone() }))
        .add("move", Arc::new(MoveCommand { dialog }))
}
