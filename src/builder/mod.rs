//! Builder API for assembling immutable machine definitions.

pub mod macros;

use crate::core::{OpName, State, StateName};
use crate::machine::Fsm;
use std::fmt;

/// Fluent builder for an [`Fsm`] definition.
///
/// States are registered by value; a bare name registers a default state
/// with no routes (convenient for terminal states). The first state
/// registered becomes the start state unless [`start`](Self::start)
/// designates another. `build` is infallible: a definition with no states
/// is legal and only fails later, when an instance is requested.
///
/// # Example
///
/// ```rust
/// use waymark::{Fsm, Route, State};
///
/// let fsm: Fsm<&str, &str> = Fsm::builder()
///     .state(State::new("placed").route("ship", Route::direct("shipped")))
///     .state(State::new("shipped").route("deliver", Route::direct("delivered")))
///     .state("delivered")
///     .build();
///
/// assert_eq!(fsm.start_state().map(|s| *s.name()), Some("placed"));
/// ```
pub struct FsmBuilder<N: StateName, O: OpName, B = (), R = ()> {
    states: Vec<State<N, O, B, R>>,
    start: Option<N>,
}

impl<N: StateName, O: OpName, B, R> FsmBuilder<N, O, B, R> {
    pub fn new() -> Self {
        FsmBuilder {
            states: Vec::new(),
            start: None,
        }
    }

    /// Register a state, or a bare name wrapped in a default state.
    ///
    /// A name collision silently replaces the earlier registration in
    /// place, keeping its registration slot (and the start role, if it had
    /// it). Last write wins; no error is raised.
    pub fn state(mut self, state: impl Into<State<N, O, B, R>>) -> Self {
        let state = state.into();
        match self
            .states
            .iter()
            .position(|existing| existing.name() == state.name())
        {
            Some(slot) => self.states[slot] = state,
            None => self.states.push(state),
        }
        self
    }

    /// Designate the start state explicitly, overriding registration order.
    ///
    /// The name is not checked against the registered states here; an
    /// unregistered start name surfaces as `UnknownState` when a default
    /// instance is created.
    pub fn start(mut self, name: N) -> Self {
        self.start = Some(name);
        self
    }

    /// Finalize into an immutable definition.
    pub fn build(self) -> Fsm<N, O, B, R> {
        let start = self
            .start
            .or_else(|| self.states.first().map(|state| state.name().clone()));
        Fsm::new(self.states, start)
    }
}

impl<N: StateName, O: OpName, B, R> Default for FsmBuilder<N, O, B, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for FsmBuilder<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmBuilder")
            .field("states", &self.states)
            .field("start", &self.start)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::routes;

    #[test]
    fn bare_names_register_default_states() {
        let fsm: Fsm<&str, &str> = FsmBuilder::new().state("closed").build();
        let closed = fsm.state(&"closed").expect("closed");
        assert!(closed.terminated());
        assert_eq!(closed.label(), "closed");
    }

    #[test]
    fn empty_builder_builds_an_empty_definition() {
        let fsm: Fsm<&str, &str> = FsmBuilder::new().build();
        assert!(fsm.states().is_empty());
        assert!(fsm.start_state().is_none());
    }

    #[test]
    fn start_defaults_to_first_registration() {
        let fsm: Fsm<&str, &str> = FsmBuilder::new()
            .state(State::new("a").route("go", Route::direct("b")))
            .state("b")
            .build();
        assert_eq!(fsm.start_state().map(|s| *s.name()), Some("a"));
    }

    #[test]
    fn routes_macro_builds_ordered_tables() {
        let fsm: Fsm<&str, &str> = FsmBuilder::new()
            .state(State::new("green").with_routes(routes! {
                "turnYellow" => "yellow",
                "close" => "closed",
            }))
            .state("yellow")
            .state("closed")
            .build();

        let green = fsm.state(&"green").expect("green");
        let ops: Vec<_> = green.routes().iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec!["turnYellow", "close"]);
    }
}
