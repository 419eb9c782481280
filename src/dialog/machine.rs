//! Handler tables, dispatch and inhabitation
//!
//! Every machine type declares one ordered handler table, built once. The
//! first handler whose match spec and state guard both hold wins, so
//! catch-all handlers go last.

use super::collation::Collation;
use super::matcher::{any_matches, MatchSpec};
use super::response::{Response, Utterance};
use crate::games::GridError;
use std::fmt::Debug;
use thiserror::Error;

/// Result of handling one utterance
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The machine stays active
    Continue(Response),
    /// The machine is done; its parent takes over with this response
    Finished(Response),
}

impl Outcome {
    #[allow(dead_code)] // Used by tests
    pub fn response(&self) -> &Response {
        match self {
            Outcome::Continue(response) | Outcome::Finished(response) => response,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished(_))
    }
}

/// Programming errors surfaced while dispatching
#[derive(Debug, Error)]
pub enum DialogError {
    #[error("machine `{parent}` already inhabits `{child}`")]
    AlreadyInhabiting {
        parent: &'static str,
        child: &'static str,
    },
    #[error("grid invariant violated: {0}")]
    Grid(#[from] GridError),
}

pub type Action<B> = fn(&mut Machine<B>, &Utterance) -> Result<Outcome, DialogError>;

/// Static description of a machine type
pub trait Behavior: Sized + Send + 'static {
    type State: Copy + Eq + Debug + Default + Send + Sync + 'static;

    /// Type tag used in logs
    const KIND: &'static str;

    /// The ordered handler table, built once per type
    fn table() -> &'static HandlerTable<Self>;
}

/// One row of a handler table
pub struct Handler<B: Behavior> {
    pub name: &'static str,
    specs: Vec<MatchSpec>,
    /// Empty means "any state"
    states: Vec<B::State>,
    action: Action<B>,
}

impl<B: Behavior> Handler<B> {
    pub fn new(name: &'static str, specs: Vec<MatchSpec>, action: Action<B>) -> Self {
        Self {
            name,
            specs,
            states: Vec::new(),
            action,
        }
    }

    /// Restrict the handler to the given states
    pub fn when(mut self, states: &[B::State]) -> Self {
        self.states = states.to_vec();
        self
    }

    fn eligible(&self, state: B::State, utterance: &Utterance, collation: &Collation) -> bool {
        (self.states.is_empty() || self.states.contains(&state))
            && any_matches(&self.specs, utterance, collation)
    }
}

/// Ordered handlers plus the collation they match with
pub struct HandlerTable<B: Behavior> {
    collation: Collation,
    handlers: Vec<Handler<B>>,
}

impl<B: Behavior> HandlerTable<B> {
    pub fn new(collation: Collation, handlers: Vec<Handler<B>>) -> Self {
        Self {
            collation,
            handlers,
        }
    }

    /// First handler eligible for `state` and `utterance`
    pub fn select(&self, state: B::State, utterance: &Utterance) -> Option<&Handler<B>> {
        self.handlers
            .iter()
            .find(|handler| handler.eligible(state, utterance, &self.collation))
    }
}

/// Object-safe view of a machine, used for children and session roots
pub trait Dispatch: Send {
    fn kind(&self) -> &'static str;

    /// Route one utterance to the innermost active machine
    fn parse(&mut self, utterance: &Utterance) -> Result<Outcome, DialogError>;

    /// Kind of the innermost active machine
    fn active_kind(&self) -> &'static str;
}

/// A running machine: current state, local fields and at most one child
pub struct Machine<B: Behavior> {
    pub state: B::State,
    pub body: B,
    child: Option<Box<dyn Dispatch>>,
}

impl<B: Behavior> Machine<B> {
    pub fn new(body: B) -> Self {
        Self {
            state: B::State::default(),
            body,
            child: None,
        }
    }

    /// Delegate all further input to `child` until it finishes
    pub fn inhabit(&mut self, child: impl Dispatch + 'static) -> Result<(), DialogError> {
        if let Some(current) = &self.child {
            return Err(DialogError::AlreadyInhabiting {
                parent: B::KIND,
                child: current.kind(),
            });
        }
        tracing::debug!(parent = B::KIND, child = child.kind(), "Inhabiting child machine");
        self.child = Some(Box::new(child));
        Ok(())
    }

    #[allow(dead_code)] // Used by tests
    pub fn is_inhabiting(&self) -> bool {
        self.child.is_some()
    }
}

impl<B: Behavior> Dispatch for Machine<B> {
    fn kind(&self) -> &'static str {
        B::KIND
    }

    fn parse(&mut self, utterance: &Utterance) -> Result<Outcome, DialogError> {
        if let Some(child) = self.child.as_mut() {
            let child_kind = child.kind();
            return match child.parse(utterance)? {
                Outcome::Finished(response) => {
                    tracing::debug!(parent = B::KIND, child = child_kind, "Child machine finished");
                    self.child = None;
                    Ok(Outcome::Continue(response))
                }
                outcome @ Outcome::Continue(_) => Ok(outcome),
            };
        }

        let Some(handler) = B::table().select(self.state, utterance) else {
            tracing::debug!(
                machine = B::KIND,
                state = ?self.state,
                command = %utterance.command,
                "No handler matched"
            );
            return Ok(Outcome::Continue(Response::unrecognized()));
        };

        tracing::debug!(
            machine = B::KIND,
            state = ?self.state,
            handler = handler.name,
            "Dispatching utterance"
        );
        (handler.action)(self, utterance)
    }

    fn active_kind(&self) -> &'static str {
        match &self.child {
            Some(child) => child.active_kind(),
            None => B::KIND,
        }
    }
}
