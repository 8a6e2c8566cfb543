//! Shared test doubles: a recording [`Bot`], scripted steps that journal their callbacks, and
//! message builders.

#![allow(dead_code)]

use async_trait::async_trait;
use dbot_core::{Bot, BotContext, Chat, Choice, Message, Postback, Result, User};
use dbot_dialog::{Event, Step};
use std::sync::{Arc, Mutex};

/// Bot that records every outbound text as `(chat_id, text)`.
#[derive(Default)]
pub struct MockBot {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl MockBot {
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
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

    async fn send_choices(&self, chat: &Chat, text: &str, _choices: &[Choice]) -> Result<()> {
        self.send_message(chat, text).await
    }
}

pub fn context() -> (BotContext, Arc<MockBot>) {
    let bot = Arc::new(MockBot::default());
    (BotContext::new(bot.clone()), bot)
}

pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

type ProcessFn = Box<dyn Fn(&Message) -> Event + Send + Sync>;

/// Step that appends `"<name>.enter"`, `"<name>.process"`, `"<name>.leave"` to a journal and
/// returns scripted events from each callback.
pub struct ScriptedStep {
    name: String,
    journal: Journal,
    on_enter: Event,
    on_process: ProcessFn,
    on_leave: Event,
}

impl ScriptedStep {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            on_enter: Event::NIL,
            on_process: Box::new(|_| Event::NIL),
            on_leave: Event::NIL,
        }
    }

    pub fn on_enter(mut self, event: impl Into<Event>) -> Self {
        self.on_enter = event.into();
        self
    }

    pub fn on_leave(mut self, event: impl Into<Event>) -> Self {
        self.on_leave = event.into();
        self
    }

    pub fn on_process<F>(mut self, f: F) -> Self
    where
        F: Fn(&Message) -> Event + Send + Sync + 'static,
    {
        self.on_process = Box::new(f);
        self
    }

    pub fn build(self) -> Arc<dyn Step> {
        Arc::new(self)
    }

    fn record(&self, callback: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}.{}", self.name, callback));
    }
}

#[async_trait]
impl Step for ScriptedStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn enter(&self, _ctx: &BotContext, _message: &Message) -> Result<Event> {
        self.record("enter");
        Ok(self.on_enter.clone())
    }

    async fn process(&self, _ctx: &BotContext, message: &Message) -> Result<Event> {
        self.record("process");
        Ok((self.on_process)(message))
    }

    async fn leave(&self, _ctx: &BotContext, _message: &Message) -> Result<Event> {
        self.record("leave");
        Ok(self.on_leave.clone())
    }
}

pub fn message(user_id: i64, text: &str) -> Message {
    Message::incoming(
        format!("msg-{}", user_id),
        User {
            id: user_id,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        Chat::private(user_id),
        text,
    )
}

pub fn postback(user_id: i64, payload: &str) -> Postback {
    Postback::new(
        format!("cb-{}", user_id),
        User::with_id(user_id),
        Chat::private(user_id),
        payload,
    )
}
