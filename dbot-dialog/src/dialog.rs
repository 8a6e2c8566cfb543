//! Dialog: per-user finite-state engine that resolves step events into transitions.

use dbot_core::{BotContext, Message, Postback};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::builder::DialogBuilder;
use crate::error::{DialogError, Result};
use crate::event::Event;
use crate::hook::DialogHook;
use crate::session::SessionTable;
use crate::step::Step;

/// A configured conversation graph plus the live sessions walking it.
///
/// The step and transition tables are frozen at build time and read without locking. Sessions
/// live in a concurrent table; events for one user are handled one at a time, events for different
/// users run fully in parallel.
pub struct Dialog {
    steps: HashMap<String, Arc<dyn Step>>,
    begin: Arc<dyn Step>,
    end: Arc<dyn Step>,
    transitions: HashMap<String, HashMap<Event, String>>,
    global_transitions: HashMap<Event, String>,
    hooks: Vec<Arc<dyn DialogHook>>,
    max_chain_depth: usize,
    sessions: SessionTable,
}

impl Dialog {
    pub fn builder() -> DialogBuilder {
        DialogBuilder::new()
    }

    pub(crate) fn from_parts(
        steps: HashMap<String, Arc<dyn Step>>,
        begin: Arc<dyn Step>,
        end: Arc<dyn Step>,
        transitions: HashMap<String, HashMap<Event, String>>,
        global_transitions: HashMap<Event, String>,
        hooks: Vec<Arc<dyn DialogHook>>,
        max_chain_depth: usize,
    ) -> Self {
        Self {
            steps,
            begin,
            end,
            transitions,
            global_transitions,
            hooks,
            max_chain_depth,
            sessions: SessionTable::new(),
        }
    }

    /// Handles one inbound message for its sender.
    ///
    /// Runs the `before_message` hooks (any of them may drop the message), then either starts a
    /// session on the begin step or feeds the message to the current step's `process`, resolves
    /// the resulting event through the transition tables, and finally runs `after_message` hooks.
    #[instrument(skip_all, fields(user_id = message.user.id, message_id = %message.id))]
    pub async fn handle_message(&self, ctx: &BotContext, message: &Message) -> Result<()> {
        for hook in &self.hooks {
            if !hook.before_message(ctx, message).await? {
                debug!("message dropped by hook");
                return Ok(());
            }
        }

        {
            let _session = self.sessions.lock(message.user.id).await;
            let (step, event) = match self.active_step(message.user.id) {
                Some(step) => {
                    debug!(step = %step.name(), "step: process");
                    let event = step.process(ctx, message).await?;
                    (step, event)
                }
                None => self.start(ctx, message).await?,
            };
            self.resolve(ctx, message, step, event).await?;
        }

        for hook in self.hooks.iter().rev() {
            hook.after_message(ctx, message).await?;
        }
        Ok(())
    }

    /// Handles a button press: the payload is handled as the text of a message from the same
    /// sender, wrapped in the postback hooks.
    #[instrument(skip_all, fields(user_id = postback.user.id, payload = %postback.payload))]
    pub async fn handle_postback(&self, ctx: &BotContext, postback: &Postback) -> Result<()> {
        for hook in &self.hooks {
            if !hook.before_postback(ctx, postback).await? {
                debug!("postback dropped by hook");
                return Ok(());
            }
        }

        self.handle_message(ctx, &postback.to_message()).await?;

        for hook in self.hooks.iter().rev() {
            hook.after_postback(ctx, postback).await?;
        }
        Ok(())
    }

    /// Deletes the user's session without calling any step. The next event starts fresh.
    /// Returns whether a session existed.
    ///
    /// Waits for any event being handled for the user to finish first, so the reset is never
    /// overwritten by a transition in flight. Like [`move_to`](Self::move_to), it must not be
    /// called from a step or hook handling the same user.
    pub async fn reset(&self, user_id: i64) -> bool {
        let _session = self.sessions.lock(user_id).await;
        let existed = self.sessions.remove(user_id);
        if existed {
            info!(user_id = user_id, "session reset");
        }
        existed
    }

    /// Forcibly moves the sender of `message` to `destination`, outside the transition graph.
    ///
    /// Leaves the current step if there is one. `None` or the end step mean "start over": short-term
    /// memory is cleared and the begin step is entered. Resolution then continues as usual from the
    /// entered step. Must not be called from a step or hook handling the same user; it waits for
    /// that user's session lock.
    #[instrument(skip_all, fields(user_id = message.user.id, destination = ?destination))]
    pub async fn move_to(
        &self,
        ctx: &BotContext,
        message: &Message,
        destination: Option<&str>,
    ) -> Result<()> {
        let target = match destination {
            Some(name) if name != self.end.name() => Some(self.require_step(name)?),
            _ => None,
        };

        let _session = self.sessions.lock(message.user.id).await;
        if let Some(current) = self.current_step_arc(message.user.id) {
            debug!(step = %current.name(), "step: leave (move)");
            current.leave(ctx, message).await?;
        }

        let (step, event) = match target {
            Some(step) => {
                info!(step = %step.name(), "session moved");
                self.sessions.set(message.user.id, step.name());
                let event = step.enter(ctx, message).await?;
                (step, event)
            }
            None => self.start(ctx, message).await?,
        };
        self.resolve(ctx, message, step, event).await
    }

    /// Name of the step the user is currently on.
    pub fn current_step(&self, user_id: i64) -> Option<String> {
        self.sessions.current(user_id)
    }

    /// Number of users with a session in progress.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn begin_step(&self) -> &Arc<dyn Step> {
        &self.begin
    }

    pub fn end_step(&self) -> &Arc<dyn Step> {
        &self.end
    }

    pub fn step(&self, name: &str) -> Option<&Arc<dyn Step>> {
        self.steps.get(name)
    }

    pub fn max_chain_depth(&self) -> usize {
        self.max_chain_depth
    }

    pub(crate) fn steps(&self) -> &HashMap<String, Arc<dyn Step>> {
        &self.steps
    }

    pub(crate) fn transitions(&self) -> &HashMap<String, HashMap<Event, String>> {
        &self.transitions
    }

    pub(crate) fn global_transitions(&self) -> &HashMap<Event, String> {
        &self.global_transitions
    }

    /// Destination for `event` leaving `source`: the point-to-point edge first, then the global one.
    pub fn destination(&self, source: &str, event: &Event) -> Option<&Arc<dyn Step>> {
        let name = self
            .transitions
            .get(source)
            .and_then(|edges| edges.get(event))
            .or_else(|| self.global_transitions.get(event))?;
        self.steps.get(name)
    }

    /// Current step, or `None` when the user has no session or sits on the end step.
    fn active_step(&self, user_id: i64) -> Option<Arc<dyn Step>> {
        self.current_step_arc(user_id)
            .filter(|step| step.name() != self.end.name())
    }

    fn current_step_arc(&self, user_id: i64) -> Option<Arc<dyn Step>> {
        let name = self.sessions.current(user_id)?;
        self.steps.get(&name).cloned()
    }

    fn require_step(&self, name: &str) -> Result<Arc<dyn Step>> {
        self.steps
            .get(name)
            .cloned()
            .ok_or_else(|| DialogError::UnknownStep(name.to_string()))
    }

    /// Fresh session: clears short-term memory, puts the user on the begin step and enters it.
    async fn start(&self, ctx: &BotContext, message: &Message) -> Result<(Arc<dyn Step>, Event)> {
        let user_id = message.user.id;
        info!(step = %self.begin.name(), "session started");
        ctx.short_term.delete(user_id).await?;
        self.sessions.set(user_id, self.begin.name());
        let event = self.begin.enter(ctx, message).await?;
        Ok((self.begin.clone(), event))
    }

    /// Follows transitions from `step` until an event has no destination. Each hop leaves the
    /// current step and enters the next one without waiting for new input. The session is
    /// deleted on `Reset` or when the chain comes to rest on the end step.
    async fn resolve(
        &self,
        ctx: &BotContext,
        message: &Message,
        mut step: Arc<dyn Step>,
        mut event: Event,
    ) -> Result<()> {
        let user_id = message.user.id;
        let mut hops = 0usize;
        loop {
            if event.is_reset() {
                self.sessions.remove(user_id);
                info!(step = %step.name(), "session reset by step");
                return Ok(());
            }
            let next = if event.is_nil() {
                None
            } else {
                self.destination(step.name(), &event).cloned()
            };
            let Some(next) = next else {
                debug!(step = %step.name(), event = %event, "no transition");
                if step.name() == self.end.name() {
                    self.sessions.remove(user_id);
                    info!(step = %step.name(), "session finished");
                }
                return Ok(());
            };

            hops += 1;
            if hops > self.max_chain_depth {
                error!(
                    step = %step.name(),
                    event = %event,
                    limit = self.max_chain_depth,
                    "transition chain too long"
                );
                return Err(DialogError::TransitionLimitExceeded {
                    user_id,
                    limit: self.max_chain_depth,
                    step: step.name().to_string(),
                });
            }

            info!(from = %step.name(), to = %next.name(), event = %event, "step: transition");
            step.leave(ctx, message).await?;
            self.sessions.set(user_id, next.name());
            event = next.enter(ctx, message).await?;
            step = next;
        }
    }
}
