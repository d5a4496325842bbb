//! Error types surfaced by definitions, instances, and callbacks.

use crate::core::{OpName, StateName};
use thiserror::Error;

/// Boxed error produced by a failing enter/leave callback.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Result returned by enter/leave callbacks.
pub type CallbackResult<R> = Result<R, CallbackError>;

/// Errors that can occur while creating instances or performing transitions.
///
/// `InvalidOperation` deliberately covers both "no such route" and "guard
/// rejected": callers that need to tell them apart must encode the
/// distinction in their own guard logic.
#[derive(Debug, Error)]
pub enum FsmError<N: StateName, O: OpName> {
    #[error("invalid operation '{op}': not allowed in state '{state}'")]
    InvalidOperation { op: O, state: N },

    #[error("unknown state '{0}'")]
    UnknownState(N),

    #[error("fsm must have a starting state to create an instance")]
    NoStartState,

    #[error("callback failed: {0}")]
    Callback(#[from] CallbackError),
}
