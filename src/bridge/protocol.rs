// ABOUTME: Wire protocol for the terminal bridge: JSON envelopes in both directions
// Builds outbound requests and classifies inbound responses by their `type` field

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Free-form `data` object carried by every envelope.
pub type Payload = Map<String, Value>;

// ============================================
// Envelope
// ============================================

/// `{"type": ..., "id": ..., "data": {...}}`, used for requests and responses alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Payload,
}

impl Envelope {
    /// Build an envelope with a freshly generated id
    pub fn new(kind: impl Into<String>, data: Payload) -> Self {
        let kind = kind.into();
        let id = generate_id(&kind);
        Self { kind, id, data }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Read a `data` field as display text. Strings are taken verbatim,
    /// other non-null values are rendered as JSON.
    pub fn text_field(&self, field: &str) -> Option<String> {
        match self.data.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// `<type>-<epoch seconds as float>`. Two sends within the clock resolution
/// produce the same id.
pub fn generate_id(kind: &str) -> String {
    let micros = Utc::now().timestamp_micros();
    let seconds = micros as f64 / 1_000_000.0;
    format!("{kind}-{seconds}")
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Payload, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Payload>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// ============================================
// Client → Bridge Requests
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Ping,
    CreateTerminal {
        terminal_name: String,
    },
    Execute {
        command: String,
        terminal_id: Option<String>,
    },
    CloseTerminal {
        terminal_id: String,
    },
}

impl Request {
    /// Value of the envelope `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Ping => "ping",
            Request::CreateTerminal { .. } => "create_terminal",
            Request::Execute { .. } => "execute",
            Request::CloseTerminal { .. } => "close_terminal",
        }
    }

    /// Contents of the envelope `data` object
    pub fn payload(&self) -> Payload {
        let mut data = Payload::new();
        match self {
            Request::Ping => {}
            Request::CreateTerminal { terminal_name } => {
                data.insert("terminalName".into(), Value::from(terminal_name.as_str()));
            }
            Request::Execute {
                command,
                terminal_id,
            } => {
                data.insert("command".into(), Value::from(command.as_str()));
                if let Some(id) = terminal_id {
                    data.insert("terminalId".into(), Value::from(id.as_str()));
                }
            }
            Request::CloseTerminal { terminal_id } => {
                data.insert("terminalId".into(), Value::from(terminal_id.as_str()));
            }
        }
        data
    }

    pub fn into_envelope(self) -> Envelope {
        Envelope::new(self.kind(), self.payload())
    }
}

// ============================================
// Bridge → Client Responses
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Pong,
    TerminalCreated {
        terminal_id: String,
        terminal_name: String,
    },
    Success {
        output: String,
    },
    Error {
        error: String,
    },
    /// Anything else, kept as the raw JSON that arrived
    Unknown(Value),
}

/// A classified inbound message
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub kind: String,
    pub id: String,
    pub response: Response,
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("`{kind}` message (id: {id}) is missing data.{field}")]
    MissingField {
        kind: String,
        id: String,
        field: &'static str,
    },
}

/// Parse one inbound text frame.
///
/// Invalid JSON and known types lacking their fields are errors scoped to
/// this message. Valid JSON that is not an envelope at all is surfaced as
/// [`Response::Unknown`].
pub fn parse_inbound(text: &str) -> Result<Inbound, ProtocolError> {
    let raw: Value = serde_json::from_str(text)?;

    let Ok(envelope) = serde_json::from_value::<Envelope>(raw.clone()) else {
        return Ok(Inbound {
            kind: String::new(),
            id: String::new(),
            response: Response::Unknown(raw),
        });
    };

    let require = |field: &'static str| {
        envelope
            .text_field(field)
            .ok_or_else(|| ProtocolError::MissingField {
                kind: envelope.kind.clone(),
                id: envelope.id.clone(),
                field,
            })
    };

    let response = match envelope.kind.as_str() {
        "pong" => Response::Pong,
        "terminal_created" => Response::TerminalCreated {
            terminal_id: require("terminalId")?,
            terminal_name: require("terminalName")?,
        },
        "success" => Response::Success {
            output: require("output")?,
        },
        "error" => Response::Error {
            error: require("error")?,
        },
        _ => Response::Unknown(raw),
    };

    Ok(Inbound {
        kind: envelope.kind,
        id: envelope.id,
        response,
    })
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

// ============================================
// Connection State
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub url: String,
    pub last_error: Option<String>,
}

impl ConnectionStatus {
    pub fn connected(url: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Connected,
            url: url.into(),
            last_error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }
}
