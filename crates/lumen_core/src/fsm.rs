//! State Machine Runtime
//!
//! Flat, typed state machines for widget interaction states. Transitions may
//! carry a guard evaluated against a caller-supplied context, so the same
//! event can lead to different states depending on outside input.
//!
//! States and events are plain `Copy` enums, so transitions are matched
//! structurally rather than through string or integer lookups.

use std::fmt::Debug;

/// A guard that decides whether a transition applies, given the context
pub type Guard<C> = Box<dyn Fn(&C) -> bool + Send>;

/// A transition in the state machine
pub struct Transition<S, E, C> {
    pub from_state: S,
    pub event: E,
    pub to_state: S,
    pub guard: Option<Guard<C>>,
}

impl<S: Copy + Eq, E: Copy + Eq, C> Transition<S, E, C> {
    /// Create an unguarded transition
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
            guard: None,
        }
    }

    /// Add a guard condition
    pub fn with_guard<F: Fn(&C) -> bool + Send + 'static>(mut self, guard: F) -> Self {
        self.guard = Some(Box::new(guard));
        self
    }

    fn matches(&self, state: S, event: E, ctx: &C) -> bool {
        self.from_state == state
            && self.event == event
            && self.guard.as_ref().map_or(true, |guard| guard(ctx))
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder<S, E, C> {
    initial_state: S,
    transitions: Vec<Transition<S, E, C>>,
}

impl<S: Copy + Eq, E: Copy + Eq, C> StateMachineBuilder<S, E, C> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Add an unguarded transition (from, event, to)
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Add a guarded transition; guards are tried in registration order
    pub fn on_if<F>(mut self, from: S, event: E, to: S, guard: F) -> Self
    where
        F: Fn(&C) -> bool + Send + 'static,
    {
        self.transitions
            .push(Transition::new(from, event, to).with_guard(guard));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine<S, E, C> {
        StateMachine {
            current_state: self.initial_state,
            transitions: self.transitions,
        }
    }
}

/// A state machine instance
pub struct StateMachine<S, E, C> {
    current_state: S,
    transitions: Vec<Transition<S, E, C>>,
}

impl<S, E, C> StateMachine<S, E, C>
where
    S: Copy + Eq + Debug,
    E: Copy + Eq + Debug,
{
    /// Create a builder for a state machine
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E, C> {
        StateMachineBuilder::new(initial_state)
    }

    /// Get the current state
    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Send an event, returning the state after it is processed
    ///
    /// The first transition whose source, event and guard match wins. Events
    /// with no matching transition leave the state unchanged.
    pub fn send(&mut self, event: E, ctx: &C) -> S {
        let current = self.current_state;
        let Some(to_state) = self
            .transitions
            .iter()
            .find(|t| t.matches(current, event, ctx))
            .map(|t| t.to_state)
        else {
            tracing::trace!("fsm: {:?} ignored in {:?}", event, current);
            return current;
        };

        tracing::debug!("fsm: {:?} --{:?}--> {:?}", current, event, to_state);
        self.current_state = to_state;
        to_state
    }

    /// Move to `state` without an event, e.g. to resync with external state
    pub fn force(&mut self, state: S) {
        if self.current_state != state {
            tracing::debug!("fsm: forced {:?} -> {:?}", self.current_state, state);
            self.current_state = state;
        }
    }
}
