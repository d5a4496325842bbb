//! Macros for terse route-table declaration.

/// Build an ordered [`Routes`](crate::Routes) table of direct routes.
///
/// Entries keep their written order, which is also the guard-evaluation and
/// enumeration order of the table. Guarded routes have no macro shorthand;
/// add them with [`Routes::insert`](crate::Routes::insert) or
/// [`State::route`](crate::State::route).
///
/// # Example
///
/// ```rust
/// use waymark::{routes, Routes};
///
/// let table: Routes<&str, &str> = routes! {
///     "turnYellow" => "yellow",
///     "close" => "closed",
/// };
/// assert_eq!(table.len(), 2);
/// ```
#[macro_export]
macro_rules! routes {
    ($($op:expr => $to:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut table = $crate::core::Routes::new();
        $(table.insert($op, $crate::core::Route::direct($to));)*
        table
    }};
}
