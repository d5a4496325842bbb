//! A traffic light cycling through its colors until it is shut down.
//!
//! Run with: cargo run --example traffic_light

use futures::future::BoxFuture;
use std::sync::Arc;
use waymark::{routes, CallbackResult, Fsm, FsmInstance, State, TransitionContext};

fn announce<'a>(
    _instance: &'a mut FsmInstance<&'static str, &'static str>,
    context: &'a TransitionContext<&'static str>,
) -> BoxFuture<'a, CallbackResult<()>> {
    Box::pin(async move {
        println!("light switched: {} -> {}", context.from, context.to);
        Ok(())
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fsm: Arc<Fsm<&str, &str>> = Arc::new(
        Fsm::builder()
            .state(
                State::new("green")
                    .labeled("Go")
                    .with_routes(routes! {
                        "turnYellow" => "yellow",
                        "close" => "closed",
                    })
                    .on_enter(announce),
            )
            .state(
                State::new("yellow")
                    .labeled("Slow down")
                    .with_routes(routes! {
                        "turnRed" => "red",
                        "close" => "closed",
                    })
                    .on_enter(announce),
            )
            .state(
                State::new("red")
                    .labeled("Stop")
                    .with_routes(routes! {
                        "turnGreen" => "green",
                        "close" => "closed",
                    })
                    .on_enter(announce),
            )
            .state(State::new("closed").on_enter(announce))
            .build(),
    );

    let mut light = fsm.create_instance()?;
    println!(
        "starting at '{}' ({})",
        light.state_name(),
        light.state().map(|s| s.label()).unwrap_or_default()
    );

    for op in ["turnYellow", "turnRed", "turnGreen", "turnYellow", "close"] {
        println!("available here: {:?}", light.get_ops().await?);
        light.perform(&op).await?;
    }

    assert!(light.terminated());
    println!("light is {} and accepts no further operations", light.state_name());
    Ok(())
}
