//! Routes: per-operation edges out of a state, optionally gated by a guard.

use crate::core::{OpName, StateName};
use crate::machine::FsmInstance;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

type GuardFn<N, O, B, R> =
    Arc<dyn for<'a> Fn(&'a FsmInstance<N, O, B, R>) -> BoxFuture<'a, bool> + Send + Sync>;

/// Predicate that decides whether a guarded route is currently available.
///
/// Guards always receive the invoking instance, so they can express
/// instance-specific conditions such as bundle equality. They are awaited
/// one at a time; the engine never evaluates two guards concurrently.
///
/// # Example
///
/// ```rust
/// use waymark::Guard;
///
/// let nonempty_bundle: Guard<&str, &str, Vec<u8>> =
///     Guard::sync(|instance| instance.bundle().is_some_and(|b: &Vec<u8>| !b.is_empty()));
/// ```
pub struct Guard<N: StateName, O: OpName, B = (), R = ()> {
    predicate: GuardFn<N, O, B, R>,
}

impl<N: StateName, O: OpName, B, R> Guard<N, O, B, R> {
    /// Create a guard from an asynchronous predicate returning a boxed future.
    pub fn new<F>(predicate: F) -> Self
    where
        F: for<'a> Fn(&'a FsmInstance<N, O, B, R>) -> BoxFuture<'a, bool> + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Create a guard from a synchronous predicate.
    pub fn sync<F>(predicate: F) -> Self
    where
        F: Fn(&FsmInstance<N, O, B, R>) -> bool + Send + Sync + 'static,
    {
        let predicate: GuardFn<N, O, B, R> = Arc::new(move |instance| {
            let verdict = predicate(instance);
            Box::pin(async move { verdict })
        });
        Guard { predicate }
    }

    /// Evaluate the guard against the invoking instance.
    pub async fn check(&self, instance: &FsmInstance<N, O, B, R>) -> bool {
        (self.predicate)(instance).await
    }
}

impl<N: StateName, O: OpName, B, R> Clone for Guard<N, O, B, R> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for Guard<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

/// A single route: where an operation leads, and under which condition.
///
/// The two shapes a host can declare are modeled as a tagged variant, so a
/// route either targets a state unconditionally or always carries a guard.
pub enum Route<N: StateName, O: OpName, B = (), R = ()> {
    /// Unconditionally available route to the named state.
    Direct(N),
    /// Route that is only available while `test` evaluates true.
    Guarded { to: N, test: Guard<N, O, B, R> },
}

impl<N: StateName, O: OpName, B, R> Route<N, O, B, R> {
    /// Unconditional route to `to`.
    pub fn direct(to: N) -> Self {
        Route::Direct(to)
    }

    /// Guarded route to `to`.
    pub fn guarded(to: N, test: Guard<N, O, B, R>) -> Self {
        Route::Guarded { to, test }
    }

    /// The route's target state name, ignoring any guard.
    pub fn target(&self) -> &N {
        match self {
            Route::Direct(to) => to,
            Route::Guarded { to, .. } => to,
        }
    }

    pub fn is_guarded(&self) -> bool {
        matches!(self, Route::Guarded { .. })
    }

    /// Whether this route can currently be taken by `instance`.
    pub(crate) async fn available(&self, instance: &FsmInstance<N, O, B, R>) -> bool {
        match self {
            Route::Direct(_) => true,
            Route::Guarded { test, .. } => test.check(instance).await,
        }
    }
}

impl<N: StateName, O: OpName, B, R> Clone for Route<N, O, B, R> {
    fn clone(&self) -> Self {
        match self {
            Route::Direct(to) => Route::Direct(to.clone()),
            Route::Guarded { to, test } => Route::Guarded {
                to: to.clone(),
                test: test.clone(),
            },
        }
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for Route<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Direct(to) => f.debug_tuple("Direct").field(to).finish(),
            Route::Guarded { to, .. } => f
                .debug_struct("Guarded")
                .field("to", to)
                .finish_non_exhaustive(),
        }
    }
}

/// Ordered route table of a state.
///
/// Operation keys are unique; re-inserting an existing key replaces the
/// route in place, keeping its original position. Iteration order is
/// insertion order, which fixes the guard evaluation order for
/// [`State::get_ops`](crate::State::get_ops) and
/// [`FsmInstance::get_relevant_states`](crate::FsmInstance::get_relevant_states).
pub struct Routes<N: StateName, O: OpName, B = (), R = ()> {
    entries: Vec<(O, Route<N, O, B, R>)>,
}

impl<N: StateName, O: OpName, B, R> Routes<N, O, B, R> {
    pub fn new() -> Self {
        Routes {
            entries: Vec::new(),
        }
    }

    /// Add a route for `op`, replacing any existing route for the same
    /// operation in place.
    pub fn insert(&mut self, op: O, route: Route<N, O, B, R>) -> &mut Self {
        match self.entries.iter_mut().find(|(existing, _)| *existing == op) {
            Some(entry) => entry.1 = route,
            None => self.entries.push((op, route)),
        }
        self
    }

    pub fn get(&self, op: &O) -> Option<&Route<N, O, B, R>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == op)
            .map(|(_, route)| route)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&O, &Route<N, O, B, R>)> {
        self.entries.iter().map(|(op, route)| (op, route))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: StateName, O: OpName, B, R> Default for Routes<N, O, B, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: StateName, O: OpName, B, R> Clone for Routes<N, O, B, R> {
    fn clone(&self) -> Self {
        Routes {
            entries: self.entries.clone(),
        }
    }
}

impl<N: StateName, O: OpName, B, R> fmt::Debug for Routes<N, O, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<N: StateName, O: OpName, B, R> FromIterator<(O, Route<N, O, B, R>)> for Routes<N, O, B, R> {
    fn from_iter<I: IntoIterator<Item = (O, Route<N, O, B, R>)>>(iter: I) -> Self {
        let mut routes = Routes::new();
        for (op, route) in iter {
            routes.insert(op, route);
        }
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestRoutes = Routes<&'static str, &'static str>;

    #[test]
    fn target_ignores_the_guard() {
        let direct: Route<&str, &str> = Route::direct("broken");
        assert_eq!(direct.target(), &"broken");
        assert!(!direct.is_guarded());

        let guarded: Route<&str, &str> = Route::guarded("broken", Guard::sync(|_| false));
        assert_eq!(guarded.target(), &"broken");
        assert!(guarded.is_guarded());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut routes = TestRoutes::new();
        routes.insert("hit", Route::direct("broken"));
        routes.insert("polish", Route::direct("shiny"));
        routes.insert("drop", Route::direct("shattered"));

        let ops: Vec<_> = routes.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec!["hit", "polish", "drop"]);
    }

    #[test]
    fn reinserting_replaces_in_place() {
        let mut routes = TestRoutes::new();
        routes.insert("hit", Route::direct("broken"));
        routes.insert("polish", Route::direct("shiny"));
        routes.insert("hit", Route::direct("shattered"));

        assert_eq!(routes.len(), 2);
        let ops: Vec<_> = routes.iter().map(|(op, _)| *op).collect();
        assert_eq!(ops, vec!["hit", "polish"]);
        assert_eq!(routes.get(&"hit").map(Route::target), Some(&"shattered"));
    }

    #[test]
    fn get_unknown_op_is_none() {
        let routes = TestRoutes::new();
        assert!(routes.get(&"hit").is_none());
        assert!(routes.is_empty());
    }

    #[test]
    fn collects_from_iterator() {
        let routes: TestRoutes = [
            ("hit", Route::direct("broken")),
            ("polish", Route::direct("shiny")),
        ]
        .into_iter()
        .collect();
        assert_eq!(routes.len(), 2);
    }
}
