//! Machine definitions and live instances.
//!
//! An [`Fsm`] is the immutable route graph produced by
//! [`FsmBuilder`](crate::FsmBuilder); an [`FsmInstance`] is one cursor
//! walking it. The transition algorithm (guard evaluation, pointer update,
//! then leave/enter callbacks in registration order) lives on the instance.

mod definition;
mod instance;

pub use definition::Fsm;
pub use instance::{FsmInstance, PerformOutcome, RelevantStates, TransitionContext};
