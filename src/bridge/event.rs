// ABOUTME: Events the bridge client reports to whoever renders the console
// Produced by the send path and the background receive loop

use crate::bridge::protocol::{ProtocolError, Response};

#[derive(Debug)]
pub enum BridgeEvent {
    /// An envelope was handed to the connection writer
    Sent { kind: String, id: String },

    /// A well-formed inbound message. `answers` names the request type whose
    /// id it echoes, when one is still outstanding.
    Received {
        kind: String,
        id: String,
        answers: Option<String>,
        response: Response,
    },

    /// An inbound message that was discarded
    Malformed(ProtocolError),

    /// The channel closed; no further events follow
    Disconnected { reason: Option<String> },
}

impl BridgeEvent {
    pub fn is_disconnect(&self) -> bool {
        matches!(self, BridgeEvent::Disconnected { .. })
    }
}
