use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::envelope::ResponseEnvelope;
use crate::error::Fault;
use crate::event::{CallContext, Event};
use crate::preprocess::Preprocessor;
use crate::recover::Recoverer;
use crate::respond::Responder;

/// One logic handler: the business logic run exactly once per invocation.
pub type LogicFn =
    Arc<dyn Fn(Event, CallContext) -> BoxFuture<'static, Result<Value, Fault>> + Send + Sync>;

/// Build a [`LogicFn`] from an async closure.
pub fn logic<F, Fut>(f: F) -> LogicFn
where
    F: Fn(Event, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, Fault>> + Send + 'static,
{
    Arc::new(move |event, ctx| Box::pin(f(event, ctx)))
}

/// The single terminal action of one pipeline run. Models the error-first
/// completion callback: `Empty` is `(null, null)`, `Raw` and `Http` are
/// `(null, result)`, and the `Err` side of [`Pipeline::call`] is `(error)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Warm-up short circuit: nothing ran, nothing to report.
    Empty,
    /// Passthrough success carrying the raw logic value.
    Raw(Value),
    /// Shaped wire response; API success and API failure both land here.
    Http(ResponseEnvelope),
}

/// Preprocess, execute and respond for a single invocation.
#[derive(Clone)]
pub struct Pipeline {
    preprocessor: Preprocessor,
    responder: Responder,
    recoverer: Recoverer,
    logic: LogicFn,
}

impl Pipeline {
    pub fn new(
        preprocessor: Preprocessor,
        responder: Responder,
        recoverer: Recoverer,
        logic: LogicFn,
    ) -> Self {
        Self {
            preprocessor,
            responder,
            recoverer,
            logic,
        }
    }

    /// Run one invocation to its terminal action. Returns exactly once:
    /// preprocessing faults, logic faults and shaping faults all funnel into
    /// the recoverer, and the warm-up marker skips every stage.
    pub async fn call(&self, event: Event, ctx: CallContext) -> Result<Reply, Fault> {
        if event.warmup_only() {
            tracing::debug!("warmup invocation, skipping logic handler");
            return Ok(Reply::Empty);
        }

        let outcome = match self.preprocessor.apply(event) {
            Ok(event) => (self.logic)(event, ctx).await,
            Err(fault) => Err(fault),
        };

        match outcome.and_then(|value| self.responder.shape(value)) {
            Ok(reply) => Ok(reply),
            Err(fault) => {
                tracing::debug!("invocation failed: {}", fault);
                self.recoverer.recover(fault)
            }
        }
    }
}
