//! # Waymark
//!
//! A declarative, async-first finite state machine library.
//!
//! A machine is described as data: named states, each carrying an ordered
//! route table mapping operation names to target states, optionally behind
//! async guards. The definition ([`Fsm`]) is immutable after
//! [`FsmBuilder::build`] and shared behind an [`Arc`](std::sync::Arc); any
//! number of [`FsmInstance`] cursors walk it independently, each with its own
//! position and an optional bundle of instance-local data.
//!
//! Performing an operation resolves the route (evaluating its guard against
//! the calling instance), moves the cursor, then awaits the origin state's
//! leave callbacks followed by the destination's enter callbacks, in
//! registration order. Callback failures propagate to the caller; the cursor
//! has already moved and is not rolled back.
//!
//! ## Example
//!
//! ```rust
//! use waymark::{Fsm, Route, State};
//! use std::sync::Arc;
//!
//! futures::executor::block_on(async {
//!     let fsm: Arc<Fsm<&str, &str>> = Arc::new(
//!         Fsm::builder()
//!             .state(State::new("placed").route("ship", Route::direct("shipped")))
//!             .state(State::new("shipped").route("deliver", Route::direct("delivered")))
//!             .state("delivered")
//!             .build(),
//!     );
//!
//!     let mut order = fsm.create_instance()?;
//!     assert_eq!(order.get_ops().await?, vec!["ship"]);
//!
//!     order.perform(&"ship").await?;
//!     order.perform(&"deliver").await?;
//!
//!     assert_eq!(order.state_name(), &"delivered");
//!     assert!(order.terminated());
//!     Ok::<_, waymark::FsmError<&str, &str>>(())
//! })
//! .unwrap();
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod machine;

pub use builder::FsmBuilder;
pub use self::core::{Callback, Guard, OpName, Route, Routes, State, StateName};
pub use error::{CallbackError, CallbackResult, FsmError};
pub use machine::{Fsm, FsmInstance, PerformOutcome, RelevantStates, TransitionContext};
