//! Named states: route tables plus ordered enter/leave callback lists.

use crate::core::route::{Route, Routes};
use crate::error::{CallbackResult, FsmError};
use crate::machine::{FsmInstance, TransitionContext};
use futures::future::BoxFuture;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Key type for state names.
///
/// Blanket-implemented for every type meeting the bounds; hosts typically
/// use `&'static str`, `String`, or a small enum with a `Display` impl.
pub trait StateName:
    Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
}

impl<T> StateName for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{}

/// Key type for operation identifiers.
pub trait OpName: Clone + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> OpName for T where T: Clone + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// Enter/leave lifecycle callback.
///
/// Callbacks receive the instance (mutably, so they can update the bundle)
/// and the context of the transition being performed. Their results are
/// collected in registration order into
/// [`PerformOutcome`](crate::PerformOutcome); a failing callback aborts the
/// rest of the sequence without rolling the transition back.
pub type Callback<N, O, B = (), R = ()> = Arc<
    dyn for<'a> Fn(
            &'a mut FsmInstance<N, O, B, R>,
            &'a TransitionContext<N>,
        ) -> BoxFuture<'a, CallbackResult<R>>
        + Send
        + Sync,
>;

enum Label<N> {
    Fixed(String),
    Derived(Arc<dyn Fn(&N) -> String + Send + Sync>),
}

/// A named node in a definition: its outgoing routes and lifecycle callbacks.
///
/// States are assembled fluently by value and then registered into a
/// [`FsmBuilder`](crate::FsmBuilder); once the definition is built, the
/// route table and callback lists can no longer change.
///
/// # Example
///
/// ```rust
/// use waymark::{Route, State};
///
/// let state: State<&str, &str> = State::new("intact")
///     .route("hit", Route::direct("broken"))
///     .labeled("Intact vase");
///
/// assert_eq!(state.name(), &"intact");
/// assert_eq!(state.label(), "Intact vase");
/// assert!(!state.terminated());
/// ```
pub struct State<N: StateName, O: OpName, B = (), R = ()> {
    name: N,
    label: Option<Label<N>>,
    routes: Routes<N, O, B, R>,
    on_enter: Vec<Callback<N, O, B, R>>,
    on_leave: Vec<Callback<N, O, B, R>>,
}

impl<N: StateName, O: OpName, B, R> State<N, O, B, R> {
    pub fn new(name: N) -> Self {
        State {
            name,
            label: None,
            routes: Routes::new(),
            on_enter: Vec::new(),
            on_leave: Vec::new(),
        }
    }

    pub fn name(&self) -> &N {
        &self.name
    }

    /// Human-readable label; defaults to the name's `Display` form.
    pub fn label(&self) -> String {
        match &self.label {
            None => self.name.to_string(),
            Some(Label::Fixed(text)) => text.clone(),
            Some(Label::Derived(derive)) => derive(&self.name),
        }
    }

    /// Set a fixed label.
    pub fn labeled(mut self, text: impl Into<String>) -> Self {
        self.label = Some(Label::Fixed(text.into()));
        self
    }

    /// Derive the label from the state name on each call.
    pub fn labeled_with<F>(mut self, derive: F) -> Self
    where
        F: Fn(&N) -> String + Send + Sync + 'static,
    {
        self.label = Some(Label::Derived(Arc::new(derive)));
        self
    }

    pub fn routes(&self) -> &Routes<N, O, B, R> {
        &self.routes
    }

    /// Replace the whole route table. This is a full overwrite, not a merge.
    pub fn with_routes(mut self, routes: Routes<N, O, B, R>) -> Self {
        self.routes = routes;
        self
    }

    /// Add a single route for `op`, replacing an existing one in place.
    pub fn route(mut self, op: O, route: Route<N, O, B, R>) -> Self {
        self.routes.insert(op, route);
        self
    }

    /// Append a callback to run after this state is entered.
    ///
    /// Callbacks run sequentially in registration order. Hosts usually pass
    /// `fn` items returning `Box::pin(async move { ... })`; see the crate
    /// docs for a worked example.
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut FsmInstance<N, O, B, R>,
                &'a TransitionContext<N>,
            ) -> BoxFuture<'a, CallbackResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.on_enter.push(Arc::new(callback));
        self
    }

    /// Append a callback to run before this state is left.
    pub fn on_leave<F>(mut self, callback: F) -> Self
    where
        F: for<'a> Fn(
                &'a mut FsmInstance<N, O, B, R>,
                &'a TransitionContext<N>,
            ) -> BoxFuture<'a, CallbackResult<R>>
            + Send
            + Sync
            + 'static,
    {
        self.on_leave.push(Arc::new(callback));
        self
    }

    pub fn on_enter_callbacks(&self) -> &[Callback<N, O, B, R>] {
        &self.on_enter
    }

    pub fn on_leave_callbacks(&self) -> &[Callback<N, O, B, R>] {
        &self.on_leave
    }

    /// A state with no outgoing routes is terminal.
    pub fn terminated(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve `op` to the next state name for `instance`.
    ///
    /// Fails with [`FsmError::InvalidOperation`] when `op` has no route in
    /// this state or when the route's guard evaluates false; the two cases
    /// are not distinguished.
    pub async fn transit(
        &self,
        op: &O,
        instance: &FsmInstance<N, O, B, R>,
    ) -> Result<N, FsmError<N, O>> {
        let invalid = || FsmError::InvalidOperation {
            op: op.clone(),
            state: self.name.clone(),
        };
        let route = self.routes.get(op).ok_or_else(invalid)?;
        if !route.available(instance).await {
            return Err(invalid());
        }
        Ok(route.target().clone())
    }

    /// Operations currently available from this state, in route-table order.
    ///
    /// Guardless routes are always included; guarded routes are included iff
    /// their guard evaluates true for `instance` right now. The answer is a
    /// point-in-time computation and is never cached.
    pub async fn get_ops(&self, instance: &FsmInstance<N, O, B, R>) -> Vec<O> {
        let mut ops = Vec::new();
        for (op, route) in self.routes.iter() {
            if route.available(instance).await {
                ops.push(op.clone());
            }
        }
        ops
    }
}

impl<N: StateName, O: OpName, B, R> From<N> for State<N, O, B, R> {
    /// Wrap a bare name in a default state with no routes and no callbacks.
    fn from(name: N) -> Self {
        State::new(name)
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for State<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("routes", &self.routes)
            .field("on_enter", &self.on_enter.len())
            .field("on_leave", &self.on_leave.len())
            .finish()
    }
}
