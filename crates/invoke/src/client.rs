use std::sync::Arc;

use serde_json::Value;

use crate::error::InvokeError;
use crate::transport::{
    EVENT_ACCEPTED, FAILURE_HANDLED, FAILURE_UNHANDLED, HttpTransport, InvokeMode, SYNC_OK,
    Transport, TransportReply, TransportRequest,
};

/// Client for calling another function through an invocation transport,
/// reclassifying how the remote call went.
#[derive(Clone)]
pub struct FunctionClient {
    transport: Arc<dyn Transport>,
}

impl FunctionClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn over_http(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpTransport::new(base_url)))
    }

    /// Invoke the remote function and wait for its result.
    pub async fn call_sync(&self, function: &str, event: &Value) -> Result<Value, InvokeError> {
        let reply = self.dispatch(function, event, InvokeMode::Sync).await?;
        if reply.status != SYNC_OK {
            return Err(InvokeError::Transport(format!(
                "unexpected invocation status {} from {}: {}",
                reply.status,
                function,
                reply.payload_text()
            )));
        }

        match reply.failure_mode.as_deref() {
            None => parse_payload(&reply, function),
            Some(FAILURE_UNHANDLED) => Err(InvokeError::Unhandled(parse_payload(&reply, function)?)),
            Some(FAILURE_HANDLED) => Err(classify_handled(&reply, function)?),
            Some(other) => Err(InvokeError::Protocol(format!(
                "unrecognized failure mode {:?} from {}",
                other, function
            ))),
        }
    }

    /// Dispatch without waiting for the remote outcome. Succeeds once the
    /// transport accepts the event; the remote result is never surfaced.
    pub async fn call_event(&self, function: &str, event: &Value) -> Result<(), InvokeError> {
        let reply = self.dispatch(function, event, InvokeMode::Event).await?;
        if reply.status != EVENT_ACCEPTED {
            return Err(InvokeError::Transport(format!(
                "dispatch to {} not accepted: status {} {}",
                function,
                reply.status,
                reply.payload_text()
            )));
        }
        Ok(())
    }

    async fn dispatch(
        &self,
        function: &str,
        event: &Value,
        mode: InvokeMode,
    ) -> Result<TransportReply, InvokeError> {
        let payload = serde_json::to_vec(event)
            .map_err(|err| InvokeError::Transport(format!("serialize event: {}", err)))?;
        self.transport
            .dispatch(TransportRequest {
                function: function.to_string(),
                payload,
                mode,
            })
            .await
            .map_err(InvokeError::Transport)
    }
}

/// A payload the service hands back must be JSON; anything else is the
/// service misbehaving, not an application error.
fn parse_payload(reply: &TransportReply, function: &str) -> Result<Value, InvokeError> {
    serde_json::from_slice(&reply.payload).map_err(|err| {
        InvokeError::Transport(format!(
            "malformed payload from invocation of {}: {}",
            function, err
        ))
    })
}

/// A handled failure often arrives with its structured error flattened to a
/// string in `errorMessage`; recover the structure when it parses.
fn classify_handled(reply: &TransportReply, function: &str) -> Result<InvokeError, InvokeError> {
    let payload = parse_payload(reply, function)?;
    let message = match payload.get("errorMessage").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => return Ok(InvokeError::Handled(payload)),
    };
    match serde_json::from_str::<Value>(&message) {
        Ok(parsed) => Ok(InvokeError::Handled(parsed)),
        Err(_) => Ok(InvokeError::Handled(Value::String(message))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::future::BoxFuture;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays one canned reply and records every dispatched request.
    struct ScriptedTransport {
        reply: Result<TransportReply, String>,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl ScriptedTransport {
        fn replying(reply: TransportReply) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl Transport for ScriptedTransport {
        fn dispatch(
            &self,
            request: TransportRequest,
        ) -> BoxFuture<'_, Result<TransportReply, String>> {
            self.requests.lock().expect("lock").push(request);
            let reply = self.reply.clone();
            Box::pin(async move { reply })
        }
    }

    fn reply(status: u16, failure_mode: Option<&str>, payload: Value) -> TransportReply {
        TransportReply {
            status,
            failure_mode: failure_mode.map(str::to_string),
            payload: payload.to_string().into_bytes(),
        }
    }

    #[tokio::test]
    async fn sync_success_parses_the_payload() {
        let transport = ScriptedTransport::replying(reply(200, None, json!({ "total": 3 })));
        let client = FunctionClient::new(transport.clone());
        let value = client
            .call_sync("orders", &json!({ "id": 1 }))
            .await
            .expect("call");
        assert_eq!(value, json!({ "total": 3 }));

        let requests = transport.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].function, "orders");
        assert_eq!(requests[0].mode, InvokeMode::Sync);
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() {
        let transport = ScriptedTransport::replying(reply(500, None, json!("gateway down")));
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        match err {
            InvokeError::Transport(message) => {
                assert!(message.contains("500"), "message: {}", message);
                assert!(message.contains("gateway down"), "message: {}", message);
            }
            other => panic!("expected transport error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn unhandled_failures_propagate_the_payload_verbatim() {
        let payload = json!({
            "errorMessage": "boom",
            "errorType": "TypeError",
            "stackTrace": ["at main"]
        });
        let transport = ScriptedTransport::replying(reply(200, Some("Unhandled"), payload.clone()));
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        assert_eq!(err, InvokeError::Unhandled(payload));
    }

    #[tokio::test]
    async fn handled_failures_recover_structured_error_messages() {
        let transport = ScriptedTransport::replying(reply(
            200,
            Some("Handled"),
            json!({ "errorMessage": "{\"code\":42}" }),
        ));
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        assert_eq!(err, InvokeError::Handled(json!({ "code": 42 })));
    }

    #[tokio::test]
    async fn handled_failures_fall_back_to_the_raw_string() {
        let transport = ScriptedTransport::replying(reply(
            200,
            Some("Handled"),
            json!({ "errorMessage": "plain failure" }),
        ));
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        assert_eq!(err, InvokeError::Handled(json!("plain failure")));
    }

    #[tokio::test]
    async fn unknown_failure_modes_fail_fast() {
        let transport = ScriptedTransport::replying(reply(200, Some("Degraded"), json!({})));
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        match err {
            InvokeError::Protocol(message) => {
                assert!(message.contains("Degraded"), "message: {}", message);
            }
            other => panic!("expected protocol error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_success_payload_is_a_transport_error() {
        let transport = ScriptedTransport::replying(TransportReply {
            status: 200,
            failure_mode: None,
            payload: b"not json".to_vec(),
        });
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        assert!(matches!(err, InvokeError::Transport(_)), "got: {:?}", err);
    }

    #[tokio::test]
    async fn fire_and_forget_checks_the_acceptance_status_exactly() {
        let transport = ScriptedTransport::replying(reply(202, None, json!(null)));
        let client = FunctionClient::new(transport.clone());
        client
            .call_event("orders", &json!({ "warmupOnly": true }))
            .await
            .expect("accepted");
        assert_eq!(
            transport.requests.lock().expect("lock")[0].mode,
            InvokeMode::Event
        );

        // 200 is the sync success status, not the acceptance status.
        let transport = ScriptedTransport::replying(reply(200, None, json!(null)));
        let client = FunctionClient::new(transport);
        let err = client
            .call_event("orders", &json!({}))
            .await
            .expect_err("must fail");
        assert!(matches!(err, InvokeError::Transport(_)), "got: {:?}", err);
    }

    #[tokio::test]
    async fn transport_failures_surface_as_transport_errors() {
        let transport = ScriptedTransport::failing("connection refused");
        let client = FunctionClient::new(transport);
        let err = client
            .call_sync("orders", &json!({}))
            .await
            .expect_err("must fail");
        assert_eq!(
            err,
            InvokeError::Transport("connection refused".to_string())
        );
    }
}
