//! Core data model: named states, ordered route tables, and guards.
//!
//! Everything here is a plain value type assembled before a definition is
//! built; the transition algorithm that drives these types lives in
//! [`crate::machine`].

mod route;
mod state;

pub use route::{Guard, Route, Routes};
pub use state::{Callback, OpName, State, StateName};
