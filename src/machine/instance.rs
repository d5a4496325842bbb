//! Live instances: a cursor into a shared definition plus a per-instance
//! bundle, and the transition algorithm that drives it.

use crate::core::{OpName, State, StateName};
use crate::error::FsmError;
use crate::machine::Fsm;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Context handed to every enter/leave callback of one transition.
///
/// `action_args` is present only when the transition was requested through
/// [`FsmInstance::perform_with`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransitionContext<N: StateName> {
    pub from: N,
    pub to: N,
    pub action_args: Option<serde_json::Value>,
}

/// Collected callback results of one successful transition, in invocation
/// order: all leave callbacks of the origin, then all enter callbacks of the
/// destination.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformOutcome<R> {
    pub on_leave_results: Vec<R>,
    pub on_enter_results: Vec<R>,
}

/// Answer of [`FsmInstance::get_relevant_states`].
///
/// `operable` holds every state with at least one currently-available route;
/// `reachable` holds every state that is the target of such a route,
/// anywhere in the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RelevantStates<N: StateName> {
    pub operable: HashSet<N>,
    pub reachable: HashSet<N>,
}

/// A live cursor into an [`Fsm`] definition.
///
/// Each instance owns its current state name and an opaque bundle payload;
/// the definition itself is shared read-only behind an [`Arc`], so any
/// number of instances can walk the same graph independently.
///
/// `perform` takes `&mut self`, so overlapping transitions on one instance
/// are unrepresentable in safe Rust; guards and callbacks within a single
/// transition are awaited strictly sequentially.
pub struct FsmInstance<N: StateName, O: OpName, B = (), R = ()> {
    fsm: Arc<Fsm<N, O, B, R>>,
    state_name: N,
    bundle: Option<B>,
}

impl<N: StateName, O: OpName, B, R> FsmInstance<N, O, B, R> {
    pub(crate) fn new(fsm: Arc<Fsm<N, O, B, R>>, state_name: N) -> Result<Self, FsmError<N, O>> {
        if fsm.state(&state_name).is_none() {
            return Err(FsmError::UnknownState(state_name));
        }
        Ok(FsmInstance {
            fsm,
            state_name,
            bundle: None,
        })
    }

    /// The shared definition this instance walks.
    pub fn definition(&self) -> &Fsm<N, O, B, R> {
        &self.fsm
    }

    /// Name of the current state.
    pub fn state_name(&self) -> &N {
        &self.state_name
    }

    /// The current state object.
    pub fn state(&self) -> Option<&State<N, O, B, R>> {
        self.fsm.state(&self.state_name)
    }

    /// Whether the current state has no outgoing routes.
    pub fn terminated(&self) -> bool {
        self.state().is_some_and(State::terminated)
    }

    /// Set the bundle during construction chains.
    pub fn with_bundle(mut self, bundle: B) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn bundle(&self) -> Option<&B> {
        self.bundle.as_ref()
    }

    pub fn bundle_mut(&mut self) -> Option<&mut B> {
        self.bundle.as_mut()
    }

    pub fn set_bundle(&mut self, bundle: B) {
        self.bundle = Some(bundle);
    }

    fn current(&self) -> Result<&State<N, O, B, R>, FsmError<N, O>> {
        self.fsm
            .state(&self.state_name)
            .ok_or_else(|| FsmError::UnknownState(self.state_name.clone()))
    }

    /// Perform `op` from the current state.
    ///
    /// On success the instance has moved to the route's target and the
    /// collected callback results are returned. On failure:
    ///
    /// - an unknown operation or a rejecting guard yields
    ///   [`FsmError::InvalidOperation`] and the instance has not moved;
    /// - a route target missing from the definition yields
    ///   [`FsmError::UnknownState`] and the instance has not moved;
    /// - a failing callback propagates as [`FsmError::Callback`] with the
    ///   instance *already moved*, since the pointer is updated before any
    ///   callback runs.
    pub async fn perform(&mut self, op: &O) -> Result<PerformOutcome<R>, FsmError<N, O>> {
        self.run_transition(op, None).await
    }

    /// Like [`perform`](Self::perform), with opaque arguments forwarded to
    /// every callback via [`TransitionContext::action_args`].
    pub async fn perform_with(
        &mut self,
        op: &O,
        args: serde_json::Value,
    ) -> Result<PerformOutcome<R>, FsmError<N, O>> {
        self.run_transition(op, Some(args)).await
    }

    async fn run_transition(
        &mut self,
        op: &O,
        action_args: Option<serde_json::Value>,
    ) -> Result<PerformOutcome<R>, FsmError<N, O>> {
        let fsm = Arc::clone(&self.fsm);
        let origin = fsm
            .state(&self.state_name)
            .ok_or_else(|| FsmError::UnknownState(self.state_name.clone()))?;
        let target = origin.transit(op, self).await?;
        let destination = fsm
            .state(&target)
            .ok_or_else(|| FsmError::UnknownState(target.clone()))?;

        // The pointer moves before any callback runs; a failing callback
        // does not roll the transition back.
        let context = TransitionContext {
            from: self.state_name.clone(),
            to: target.clone(),
            action_args,
        };
        self.state_name = target;

        let mut on_leave_results = Vec::with_capacity(origin.on_leave_callbacks().len());
        for callback in origin.on_leave_callbacks() {
            on_leave_results.push(callback(self, &context).await?);
        }

        let mut on_enter_results = Vec::with_capacity(destination.on_enter_callbacks().len());
        for callback in destination.on_enter_callbacks() {
            on_enter_results.push(callback(self, &context).await?);
        }

        Ok(PerformOutcome {
            on_leave_results,
            on_enter_results,
        })
    }

    /// Operations currently available from the current state, in route-table
    /// order. Delegates to [`State::get_ops`].
    pub async fn get_ops(&self) -> Result<Vec<O>, FsmError<N, O>> {
        let current = self.current()?;
        Ok(current.get_ops(self).await)
    }

    /// Reachability analysis over the whole definition, evaluated against
    /// *this* instance.
    ///
    /// Every route of every registered state is inspected: a route counts as
    /// reachable if it is guardless or its guard evaluates true for this
    /// instance. Traversal is registration order, then route-table order;
    /// guards are expected to be pure, and the engine guarantees only one
    /// deterministic traversal per call.
    pub async fn get_relevant_states(&self) -> RelevantStates<N> {
        let mut operable = HashSet::new();
        let mut reachable = HashSet::new();
        for state in self.fsm.states() {
            let mut any_route_open = false;
            for (_, route) in state.routes().iter() {
                if route.available(self).await {
                    reachable.insert(route.target().clone());
                    any_route_open = true;
                }
            }
            if any_route_open {
                operable.insert(state.name().clone());
            }
        }
        RelevantStates {
            operable,
            reachable,
        }
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for FsmInstance<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FsmInstance")
            .field("state_name", &self.state_name)
            .field("bundle", &self.bundle.is_some())
            .finish()
    }
}
