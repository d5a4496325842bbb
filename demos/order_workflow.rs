//! An order workflow with a payment-guarded shipping route, a per-order
//! bundle, and action arguments forwarded to callbacks.
//!
//! Run with: cargo run --example order_workflow

use futures::future::BoxFuture;
use serde_json::json;
use std::sync::Arc;
use waymark::{CallbackResult, Fsm, FsmInstance, Guard, Route, State, TransitionContext};

#[derive(Debug, Default)]
struct Order {
    paid: bool,
    notes: Vec<String>,
}

type Instance = FsmInstance<&'static str, &'static str, Order, String>;

fn payment_received<'a>(instance: &'a Instance) -> BoxFuture<'a, bool> {
    Box::pin(async move { instance.bundle().is_some_and(|order| order.paid) })
}

fn record_note<'a>(
    instance: &'a mut Instance,
    context: &'a TransitionContext<&'static str>,
) -> BoxFuture<'a, CallbackResult<String>> {
    Box::pin(async move {
        let note = match &context.action_args {
            Some(args) => format!("{} -> {} ({args})", context.from, context.to),
            None => format!("{} -> {}", context.from, context.to),
        };
        if let Some(order) = instance.bundle_mut() {
            order.notes.push(note.clone());
        }
        Ok(note)
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fsm: Arc<Fsm<&str, &str, Order, String>> = Arc::new(
        Fsm::builder()
            .state(
                State::new("placed")
                    .route("pay", Route::direct("paid"))
                    .route("cancel", Route::direct("cancelled"))
                    .on_leave(record_note),
            )
            .state(
                State::new("paid")
                    .route("ship", Route::guarded("shipped", Guard::new(payment_received)))
                    .on_enter(record_note),
            )
            .state(
                State::new("shipped")
                    .route("deliver", Route::direct("delivered"))
                    .on_enter(record_note),
            )
            .state(State::new("delivered").on_enter(record_note))
            .state("cancelled")
            .build(),
    );

    let mut order = Arc::clone(&fsm)
        .create_instance()?
        .with_bundle(Order::default());

    // Shipping is guarded on payment, so it is not reachable yet.
    let before = order.get_relevant_states().await;
    println!("reachable before payment: {:?}", before.reachable);

    order
        .perform_with(&"pay", json!({ "method": "card" }))
        .await?;
    if let Some(bundle) = order.bundle_mut() {
        bundle.paid = true;
    }

    let after = order.get_relevant_states().await;
    println!("reachable after payment: {:?}", after.reachable);

    let outcome = order.perform(&"ship").await?;
    println!("ship callbacks returned: {:?}", outcome.on_enter_results);
    order.perform(&"deliver").await?;

    assert!(order.terminated());
    if let Some(bundle) = order.bundle() {
        println!("order history:");
        for note in &bundle.notes {
            println!("  {note}");
        }
    }
    Ok(())
}
