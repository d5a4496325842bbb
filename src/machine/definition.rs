//! Immutable machine definitions shared by any number of instances.

use crate::builder::FsmBuilder;
use crate::core::{OpName, State, StateName};
use crate::error::FsmError;
use crate::machine::FsmInstance;
use std::fmt;
use std::sync::Arc;

/// An immutable-after-construction registry of states.
///
/// A definition is produced once by [`FsmBuilder::build`] and then shared
/// behind an [`Arc`]; every instance created from it independently walks the
/// same read-only route graph. Route targets are *not* validated at build
/// time; a route to an unregistered state surfaces lazily as
/// [`FsmError::UnknownState`] when the transition is performed.
pub struct Fsm<N: StateName, O: OpName, B = (), R = ()> {
    states: Vec<State<N, O, B, R>>,
    start: Option<N>,
}

impl<N: StateName, O: OpName, B, R> Fsm<N, O, B, R> {
    pub(crate) fn new(states: Vec<State<N, O, B, R>>, start: Option<N>) -> Self {
        Fsm { states, start }
    }

    pub fn builder() -> FsmBuilder<N, O, B, R> {
        FsmBuilder::new()
    }

    /// All registered states, in registration order.
    pub fn states(&self) -> &[State<N, O, B, R>] {
        &self.states
    }

    /// Look up a state by name.
    pub fn state(&self, name: &N) -> Option<&State<N, O, B, R>> {
        self.states.iter().find(|state| state.name() == name)
    }

    /// The designated start state, if any state was ever registered.
    pub fn start_state(&self) -> Option<&State<N, O, B, R>> {
        self.start.as_ref().and_then(|name| self.state(name))
    }

    /// Create an instance positioned at the start state.
    pub fn create_instance(self: Arc<Self>) -> Result<FsmInstance<N, O, B, R>, FsmError<N, O>> {
        let start = self.start.clone().ok_or(FsmError::NoStartState)?;
        FsmInstance::new(self, start)
    }

    /// Create an instance positioned at an explicit state.
    ///
    /// Still requires the definition to have a start state, and fails with
    /// [`FsmError::UnknownState`] if `state_name` is not registered.
    pub fn create_instance_at(
        self: Arc<Self>,
        state_name: N,
    ) -> Result<FsmInstance<N, O, B, R>, FsmError<N, O>> {
        if self.start.is_none() {
            return Err(FsmError::NoStartState);
        }
        FsmInstance::new(self, state_name)
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for Fsm<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fsm")
            .field("states", &self.states)
            .field("start", &self.start)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;

    #[test]
    fn first_registered_state_becomes_start() {
        let fsm: Fsm<&str, &str> = Fsm::builder()
            .state(State::new("started").route("finish", Route::direct("ended")))
            .state("ended")
            .build();

        let start = fsm.start_state().expect("start state");
        assert_eq!(start.name(), &"started");
    }

    #[test]
    fn explicit_start_overrides_registration_order() {
        let fsm: Fsm<&str, &str> = Fsm::builder()
            .state("first")
            .state("second")
            .start("second")
            .build();

        assert_eq!(fsm.start_state().map(State::name), Some(&"second"));
    }

    #[test]
    fn colliding_names_silently_replace() {
        let fsm: Fsm<&str, &str> = Fsm::builder()
            .state(State::new("door").route("open", Route::direct("open")))
            .state("open")
            .state(State::new("door").route("kick", Route::direct("open")))
            .build();

        assert_eq!(fsm.states().len(), 2);
        let door = fsm.state(&"door").expect("door");
        assert!(door.routes().get(&"open").is_none());
        assert!(door.routes().get(&"kick").is_some());
        // Replacement keeps the original registration slot and the start role.
        assert_eq!(fsm.start_state().map(State::name), Some(&"door"));
    }

    #[test]
    fn create_instance_defaults_to_start_state() {
        let fsm: Arc<Fsm<&str, &str>> = Arc::new(
            Fsm::builder()
                .state(State::new("started").route("finish", Route::direct("ended")))
                .state("ended")
                .build(),
        );

        let instance = Arc::clone(&fsm).create_instance().unwrap();
        assert_eq!(instance.state_name(), &"started");
    }

    #[test]
    fn create_instance_at_positions_explicitly() {
        let fsm: Arc<Fsm<&str, &str>> = Arc::new(
            Fsm::builder()
                .state(State::new("started").route("finish", Route::direct("ended")))
                .state("ended")
                .build(),
        );

        let instance = Arc::clone(&fsm).create_instance_at("ended").unwrap();
        assert_eq!(instance.state_name(), &"ended");
        assert!(instance.terminated());
    }

    #[test]
    fn create_instance_at_unknown_state_fails() {
        let fsm: Arc<Fsm<&str, &str>> = Arc::new(Fsm::builder().state("only").build());

        let err = Arc::clone(&fsm).create_instance_at("missing").unwrap_err();
        assert!(matches!(err, FsmError::UnknownState(name) if name == "missing"));
    }

    #[test]
    fn empty_definition_cannot_create_instances() {
        let fsm: Arc<Fsm<&str, &str>> = Arc::new(Fsm::builder().build());

        let err = Arc::clone(&fsm).create_instance().unwrap_err();
        assert!(matches!(err, FsmError::NoStartState));
    }
}
