use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HttpError;
use crate::event::{CallContext, Event};
use crate::pipeline::LogicFn;

/// Wrap a verb-to-handler mapping into one logic handler. Lookup is
/// case-insensitive; an event without `httpMethod` or with an unregistered
/// verb fails with a validation fault before any handler runs.
pub fn methods(map: HashMap<String, LogicFn>) -> LogicFn {
    let table: Arc<HashMap<String, LogicFn>> = Arc::new(
        map.into_iter()
            .map(|(verb, handler)| (verb.to_ascii_lowercase(), handler))
            .collect(),
    );

    Arc::new(move |event: Event, ctx: CallContext| {
        let table = Arc::clone(&table);
        Box::pin(async move {
            let Some(verb) = event.http_method().map(str::to_string) else {
                return Err(HttpError::validation("Missing HTTP method").into());
            };
            match table.get(&verb.to_ascii_lowercase()) {
                Some(handler) => handler(event, ctx).await,
                None => Err(HttpError::validation(format!("Unsupported method: {}", verb)).into()),
            }
        })
    })
}
