//! Dialog configuration. Tables are filled here and frozen by [`DialogBuilder::build`].

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::dialog::Dialog;
use crate::error::{DialogError, Result};
use crate::event::Event;
use crate::hook::DialogHook;
use crate::step::Step;

/// Longest chain of cascading transitions one inbound event may trigger.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 32;

/// Collects steps, transitions and hooks. The first configuration error is kept and returned by
/// [`build`](Self::build), so calls can be chained without checking each one.
pub struct DialogBuilder {
    steps: HashMap<String, Arc<dyn Step>>,
    begin: Option<Arc<dyn Step>>,
    end: Option<Arc<dyn Step>>,
    transitions: HashMap<String, HashMap<Event, String>>,
    global_transitions: HashMap<Event, String>,
    hooks: Vec<Arc<dyn DialogHook>>,
    max_chain_depth: usize,
    error: Option<DialogError>,
}

impl DialogBuilder {
    pub fn new() -> Self {
        Self {
            steps: HashMap::new(),
            begin: None,
            end: None,
            transitions: HashMap::new(),
            global_transitions: HashMap::new(),
            hooks: Vec::new(),
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            error: None,
        }
    }

    /// Step every new session starts on.
    pub fn begin_step(mut self, step: Arc<dyn Step>) -> Self {
        self.register(&step);
        self.begin = Some(step);
        self
    }

    /// Step that ends a session once reached.
    pub fn end_step(mut self, step: Arc<dyn Step>) -> Self {
        self.register(&step);
        self.end = Some(step);
        self
    }

    /// Registers transitions triggered by `event`.
    ///
    /// With one step, that step becomes the global destination for `event`: it applies to every
    /// step without a more specific rule. With more, the last step is the destination and each of
    /// the others gets its own edge to it; `[a, b, c]` creates a→c and b→c, never a→b.
    pub fn add_transition<I>(mut self, event: impl Into<Event>, steps: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Step>>,
    {
        let event = event.into();
        let mut steps: Vec<Arc<dyn Step>> = steps.into_iter().collect();
        if event.is_reserved() {
            self.fail(DialogError::ReservedEvent(event));
            return self;
        }
        let Some(destination) = steps.pop() else {
            self.fail(DialogError::EmptyTransition(event));
            return self;
        };
        for source in &steps {
            self.register(source);
        }
        self.register(&destination);
        let dst = destination.name().to_string();

        if steps.is_empty() {
            debug!(event = %event, destination = %dst, "global transition registered");
            if let Some(previous) = self.global_transitions.insert(event.clone(), dst.clone()) {
                warn!(event = %event, previous = %previous, destination = %dst, "global transition overwritten");
            }
            return self;
        }

        for source in steps {
            let src = source.name().to_string();
            debug!(event = %event, source = %src, destination = %dst, "transition registered");
            let edges = self.transitions.entry(src.clone()).or_default();
            if let Some(previous) = edges.insert(event.clone(), dst.clone()) {
                warn!(event = %event, source = %src, previous = %previous, destination = %dst, "transition overwritten");
            }
        }
        self
    }

    /// Appends a hook; `before_*` run in registration order, `after_*` in reverse.
    pub fn hook(mut self, hook: Arc<dyn DialogHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Overrides [`DEFAULT_MAX_CHAIN_DEPTH`]. Values below 1 are raised to 1.
    pub fn max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth.max(1);
        self
    }

    /// Freezes the tables. Fails on the first configuration error recorded, or when the begin or end
    /// step is missing.
    pub fn build(self) -> Result<Dialog> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let begin = self.begin.ok_or(DialogError::MissingBeginStep)?;
        let end = self.end.ok_or(DialogError::MissingEndStep)?;
        if begin.name() == end.name() {
            return Err(DialogError::BeginIsEnd(begin.name().to_string()));
        }
        Ok(Dialog::from_parts(
            self.steps,
            begin,
            end,
            self.transitions,
            self.global_transitions,
            self.hooks,
            self.max_chain_depth,
        ))
    }

    fn register(&mut self, step: &Arc<dyn Step>) {
        let name = step.name();
        match self.steps.get(name) {
            Some(existing) if !same_step(existing, step) => {
                self.fail(DialogError::DuplicateStep(name.to_string()));
            }
            Some(_) => {}
            None => {
                self.steps.insert(name.to_string(), step.clone());
            }
        }
    }

    fn fail(&mut self, error: DialogError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl Default for DialogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn same_step(a: &Arc<dyn Step>, b: &Arc<dyn Step>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
