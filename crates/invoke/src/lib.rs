//! Cross-function invocation: a transport seam, a default HTTP transport,
//! and a client that reclassifies how the remote call went (service failure
//! vs. crashed function vs. deliberate application error).

pub mod client;
pub mod error;
pub mod transport;

pub use client::FunctionClient;
pub use error::InvokeError;
pub use transport::{
    EVENT_ACCEPTED, FAILURE_HANDLED, FAILURE_UNHANDLED, HttpTransport, InvokeMode, SYNC_OK,
    Transport, TransportReply, TransportRequest,
};
