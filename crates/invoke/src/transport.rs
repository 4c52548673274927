use bytes::Bytes;
use futures_util::future::BoxFuture;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

/// Status the transport reports for a completed synchronous call.
pub const SYNC_OK: u16 = 200;
/// Status the transport reports when it accepted a fire-and-forget dispatch.
pub const EVENT_ACCEPTED: u16 = 202;

/// The only two recognized failure-mode discriminator values. Anything else
/// from the transport is a protocol violation.
pub const FAILURE_HANDLED: &str = "Handled";
pub const FAILURE_UNHANDLED: &str = "Unhandled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeMode {
    Sync,
    Event,
}

impl InvokeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvokeMode::Sync => "sync",
            InvokeMode::Event => "event",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub function: String,
    pub payload: Vec<u8>,
    pub mode: InvokeMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    pub status: u16,
    pub failure_mode: Option<String>,
    pub payload: Vec<u8>,
}

impl TransportReply {
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Seam between the client's classification logic and the wire.
pub trait Transport: Send + Sync {
    fn dispatch(&self, request: TransportRequest)
    -> BoxFuture<'_, Result<TransportReply, String>>;
}

/// Default transport: POSTs the event to an invocation gateway and reads the
/// failure-mode discriminator from the `x-function-failure` header.
pub struct HttpTransport {
    base_url: String,
    client: Client<HttpConnector, Full<Bytes>>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

impl Transport for HttpTransport {
    fn dispatch(
        &self,
        request: TransportRequest,
    ) -> BoxFuture<'_, Result<TransportReply, String>> {
        Box::pin(async move {
            let uri = format!(
                "{}/functions/{}/invocations",
                self.base_url, request.function
            );
            let wire = hyper::Request::builder()
                .method(hyper::Method::POST)
                .uri(&uri)
                .header("content-type", "application/json")
                .header("x-invoke-mode", request.mode.as_str())
                .body(Full::new(Bytes::from(request.payload)))
                .map_err(|err| format!("invalid invocation request: {}", err))?;

            let response = self
                .client
                .request(wire)
                .await
                .map_err(|err| format!("invocation transport failed: {}", err))?;

            let status = response.status().as_u16();
            let failure_mode = response
                .headers()
                .get("x-function-failure")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let payload = response
                .into_body()
                .collect()
                .await
                .map_err(|err| format!("invocation response read failed: {}", err))?
                .to_bytes()
                .to_vec();

            tracing::debug!(
                "invocation reply for {}: status {} failure_mode {:?}",
                request.function,
                status,
                failure_mode
            );

            Ok(TransportReply {
                status,
                failure_mode,
                payload,
            })
        })
    }
}
