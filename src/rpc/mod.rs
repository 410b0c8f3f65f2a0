//! Batch-RPC wire layer: envelope codec, result extraction, transport and session.

pub mod codec;
pub mod extract;
pub mod ops;
pub mod session;
pub mod transport;

pub use extract::RpcPayload;
pub use ops::RpcCall;
pub use session::{RpcSession, SessionTokens, WireSettings};
pub use transport::{HttpTransport, PageResponse, Transport, TransportTimeouts};
