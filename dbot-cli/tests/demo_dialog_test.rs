//! End-to-end runs of the demo dialog and operator commands against a recording bot.

use async_trait::async_trait;
use dbot_cli::demo::{ASK_AGE, ASK_NAME, CONFIRM};
use dbot_cli::{build_commander, build_dialog};
use dbot_core::{
    Bot, BotContext, Chat, Choice, DbotError, HandlerError, Message, Postback, Result, User,
};
use dbot_dialog::{Dialog, DEFAULT_MAX_CHAIN_DEPTH};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockBot {
    sent: Mutex<Vec<(i64, String)>>,
    choices: Mutex<Vec<Vec<String>>>,
}

impl MockBot {
    fn last_text(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, t)| t.clone())
            .unwrap_or_default()
    }

    fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_choices(&self, chat: &Chat, text: &str, choices: &[Choice]) -> Result<()> {
        self.choices
            .lock()
            .unwrap()
            .push(choices.iter().map(|c| c.payload.clone()).collect());
        self.send_message(chat, text).await
    }
}

fn setup() -> (BotContext, Arc<MockBot>, Dialog) {
    let bot = Arc::new(MockBot::default());
    let ctx = BotContext::new(bot.clone());
    let dialog = build_dialog(DEFAULT_MAX_CHAIN_DEPTH, &[]).unwrap();
    (ctx, bot, dialog)
}

fn text(user_id: i64, content: &str) -> Message {
    Message::incoming(
        "m",
        User::with_id(user_id),
        Chat::private(user_id),
        content,
    )
}

fn press(user_id: i64, payload: &str) -> Postback {
    Postback::new("cb", User::with_id(user_id), Chat::private(user_id), payload)
}

/// **Test: Full sign-up: name, bad age, age, "no" loops back, then "yes" ends the session.**
#[tokio::test]
async fn test_sign_up_flow() {
    let (ctx, bot, dialog) = setup();

    dialog.handle_message(&ctx, &text(1, "hi")).await.unwrap();
    assert_eq!(bot.last_text(), "Hi! What's your name?");
    assert_eq!(dialog.current_step(1).as_deref(), Some(ASK_NAME));

    dialog.handle_message(&ctx, &text(1, "Ada")).await.unwrap();
    assert_eq!(bot.last_text(), "Nice to meet you, Ada! How old are you?");

    dialog.handle_message(&ctx, &text(1, "old")).await.unwrap();
    assert_eq!(bot.last_text(), "Please send your age as a number.");
    assert_eq!(dialog.current_step(1).as_deref(), Some(ASK_AGE));

    dialog.handle_message(&ctx, &text(1, "36")).await.unwrap();
    assert_eq!(bot.last_text(), "So you are Ada, 36 years old. Is that right?");
    assert_eq!(
        bot.choices.lock().unwrap().last().cloned(),
        Some(vec!["yes".to_string(), "no".to_string()])
    );

    dialog.handle_postback(&ctx, &press(1, "no")).await.unwrap();
    assert_eq!(bot.last_text(), "Hi! What's your name?");
    assert_eq!(dialog.current_step(1).as_deref(), Some(ASK_NAME));

    dialog.handle_message(&ctx, &text(1, "Grace")).await.unwrap();
    dialog.handle_message(&ctx, &text(1, "40")).await.unwrap();
    dialog.handle_postback(&ctx, &press(1, "yes")).await.unwrap();

    assert_eq!(bot.last_text(), "Thanks, Grace! Send any message to start again.");
    assert_eq!(dialog.current_step(1), None);
    assert_eq!(
        ctx.long_term.get(1, "name").await.unwrap().as_deref(),
        Some("Grace")
    );
}

/// **Test: "cancel" ends the session without reaching goodbye.**
#[tokio::test]
async fn test_cancel_resets() {
    let (ctx, bot, dialog) = setup();

    dialog.handle_message(&ctx, &text(2, "hi")).await.unwrap();
    dialog.handle_message(&ctx, &text(2, "Ada")).await.unwrap();
    dialog.handle_message(&ctx, &text(2, "Cancel")).await.unwrap();

    assert_eq!(dialog.current_step(2), None);
    assert!(!bot.sent_to(2).iter().any(|t| t.starts_with("Thanks")));
}

/// **Test: "start over" from any step returns to the name question.**
#[tokio::test]
async fn test_start_over_from_age() {
    let (ctx, bot, dialog) = setup();

    dialog.handle_message(&ctx, &text(3, "hi")).await.unwrap();
    dialog.handle_message(&ctx, &text(3, "Ada")).await.unwrap();
    dialog.handle_message(&ctx, &text(3, "start over")).await.unwrap();

    assert_eq!(dialog.current_step(3).as_deref(), Some(ASK_NAME));
    assert_eq!(bot.last_text(), "Hi! What's your name?");
}

/// **Test: /reset ends a user's session and reports back to the operator chat.**
#[tokio::test]
async fn test_reset_command() {
    let (ctx, bot, dialog) = setup();
    let dialog = Arc::new(dialog);
    let commander = build_commander(dialog.clone());

    dialog.handle_message(&ctx, &text(4, "hi")).await.unwrap();
    commander
        .handle_echo(&ctx, &text(99, "/reset 4"))
        .await
        .unwrap();

    assert_eq!(dialog.current_step(4), None);
    assert_eq!(bot.sent_to(99), vec!["Session of 4 reset.".to_string()]);

    commander
        .handle_echo(&ctx, &text(99, "/reset 4"))
        .await
        .unwrap();
    assert_eq!(bot.last_text(), "4 has no session.");
}

/// **Test: /move puts a user on the named step and enters it in the user's chat.**
#[tokio::test]
async fn test_move_command() {
    let (ctx, bot, dialog) = setup();
    let dialog = Arc::new(dialog);
    let commander = build_commander(dialog.clone());

    commander
        .handle_echo(&ctx, &text(99, "/move 5 confirm"))
        .await
        .unwrap();

    assert_eq!(dialog.current_step(5).as_deref(), Some(CONFIRM));
    assert_eq!(
        bot.sent_to(5),
        vec!["So you are friend, friend years old. Is that right?".to_string()]
    );
    assert_eq!(bot.sent_to(99), vec!["5 is now on confirm.".to_string()]);
}

/// **Test: Malformed or unknown targets come back as errors.**
#[tokio::test]
async fn test_move_command_errors() {
    let (ctx, _bot, dialog) = setup();
    let commander = build_commander(Arc::new(dialog));

    assert!(commander
        .handle_echo(&ctx, &text(99, "/move abc"))
        .await
        .is_err());
    assert!(commander
        .handle_echo(&ctx, &text(99, "/move 5 nowhere"))
        .await
        .is_err());
}

/// **Test: /reset without a user id is rejected as empty content and resets nobody.**
#[tokio::test]
async fn test_reset_command_without_user_id() {
    let (ctx, _bot, dialog) = setup();
    let dialog = Arc::new(dialog);
    let commander = build_commander(dialog.clone());
    dialog.handle_message(&ctx, &text(4, "hi")).await.unwrap();

    let result = commander.handle_echo(&ctx, &text(99, "/reset")).await;

    assert!(matches!(
        result,
        Err(DbotError::Handler(HandlerError::EmptyContent))
    ));
    assert_eq!(dialog.current_step(4).as_deref(), Some(ASK_NAME));
}

/// **Test: /help lists the commands.**
#[tokio::test]
async fn test_help_command() {
    let (ctx, bot, dialog) = setup();
    let commander = build_commander(Arc::new(dialog));

    commander.handle_echo(&ctx, &text(99, "/help")).await.unwrap();
    assert!(bot.last_text().contains("/reset <user_id>"));
}

/// **Test: The rendered graph shows every step and the global transition.**
#[test]
fn test_render_demo_graph() {
    let dialog = build_dialog(DEFAULT_MAX_CHAIN_DEPTH, &[]).unwrap();
    let dot = dialog.to_dot();

    for name in ["ask_name", "ask_age", "confirm", "goodbye", "start_over", "rejected"] {
        assert!(dot.contains(name), "missing {} in\n{}", name, dot);
    }
}

/// **Test: With an allowlist, other users never get a session.**
#[tokio::test]
async fn test_allowlist_blocks_strangers() {
    let bot = Arc::new(MockBot::default());
    let ctx = BotContext::new(bot.clone());
    let dialog = build_dialog(DEFAULT_MAX_CHAIN_DEPTH, &[7]).unwrap();

    dialog.handle_message(&ctx, &text(8, "hi")).await.unwrap();
    dialog.handle_message(&ctx, &text(7, "hi")).await.unwrap();

    assert_eq!(dialog.current_step(8), None);
    assert_eq!(dialog.current_step(7).as_deref(), Some(ASK_NAME));
}
