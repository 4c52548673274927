//! Warm-up fan-out: ping a list of functions with a warmup-marked event so
//! their instances stay initialized. Individual dispatch failures are logged
//! and suppressed; the handler resolves only after every target was tried.

use std::sync::Arc;

use serde_json::json;

use handler::{CallContext, Event, LogicFn, Pipeline, raw};
use invoke::FunctionClient;

/// Logic handler that fire-and-forgets a warmup event to every target and
/// reports how many dispatches were accepted.
pub fn warmer(client: FunctionClient, targets: Vec<String>) -> LogicFn {
    let targets = Arc::new(targets);
    Arc::new(move |_event: Event, _ctx: CallContext| {
        let client = client.clone();
        let targets = Arc::clone(&targets);
        Box::pin(async move {
            let ping = json!({ "warmupOnly": true });
            let mut warmed = 0usize;
            let mut failed = 0usize;
            for target in targets.iter() {
                match client.call_event(target, &ping).await {
                    Ok(()) => warmed += 1,
                    Err(err) => {
                        failed += 1;
                        tracing::warn!("warmup dispatch to {} failed: {}", target, err);
                    }
                }
            }
            tracing::debug!("warmup round done: {} warmed, {} failed", warmed, failed);
            Ok(json!({ "warmed": warmed, "failed": failed }))
        })
    })
}

/// The warmer behind a passthrough pipeline, so a warmup-marked event aimed
/// at the warmer itself short-circuits like any other handler.
pub fn warmer_handler(client: FunctionClient, targets: Vec<String>) -> Pipeline {
    raw(warmer(client, targets))
}
