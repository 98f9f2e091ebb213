// ABOUTME: Terminal bridge client: wire protocol, connection handling and local terminal cache
// Talks JSON envelopes over a single WebSocket to the bridge service

pub mod error;
pub mod event;
pub mod protocol;
pub mod registry;
pub mod websocket_client;

pub use error::BridgeError;
pub use event::BridgeEvent;
pub use protocol::{ConnectionState, ConnectionStatus, Envelope, Request, Response};
pub use registry::{TerminalEntry, TerminalRegistry};
pub use websocket_client::{BridgeClient, DEFAULT_URL};
