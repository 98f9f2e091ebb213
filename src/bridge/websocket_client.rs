// ABOUTME: WebSocket client for the terminal bridge service
// Owns the connection, runs the receive loop, and funnels every request through send_message

use crate::bridge::error::BridgeError;
use crate::bridge::event::BridgeEvent;
use crate::bridge::protocol::{
    parse_inbound, ConnectionState, ConnectionStatus, Envelope, Payload, Request, Response,
};
use crate::bridge::registry::{TerminalEntry, TerminalRegistry};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, error, info, warn};

/// Default bridge endpoint
pub const DEFAULT_URL: &str = "ws://localhost:3000";

/// How long disconnect waits for the close frame to be flushed
const CLOSE_GRACE: Duration = Duration::from_millis(500);

/// State touched by both the foreground caller and the receive loop
#[derive(Clone)]
struct Shared {
    status: Arc<RwLock<ConnectionStatus>>,
    registry: Arc<RwLock<TerminalRegistry>>,
    /// Outstanding request id → request type
    pending: Arc<Mutex<HashMap<String, String>>>,
    events: mpsc::UnboundedSender<BridgeEvent>,
}

impl Shared {
    fn new(status: ConnectionStatus, events: mpsc::UnboundedSender<BridgeEvent>) -> Self {
        Self {
            status: Arc::new(RwLock::new(status)),
            registry: Arc::new(RwLock::new(TerminalRegistry::new())),
            pending: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    fn emit(&self, event: BridgeEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped, event discarded");
        }
    }

    /// Process one inbound text frame. Failures stay scoped to this frame.
    async fn handle_text(&self, text: &str) {
        let inbound = match parse_inbound(text) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!("Failed to parse message: {}", e);
                self.emit(BridgeEvent::Malformed(e));
                return;
            }
        };

        debug!("Received message: {} (id: {})", inbound.kind, inbound.id);

        if let Response::TerminalCreated {
            terminal_id,
            terminal_name,
        } = &inbound.response
        {
            self.registry
                .write()
                .await
                .insert(terminal_id.clone(), terminal_name.clone());
            info!("Registered terminal {} ({})", terminal_name, terminal_id);
        }

        let answers = if inbound.id.is_empty() {
            None
        } else {
            self.pending.lock().await.remove(&inbound.id)
        };

        self.emit(BridgeEvent::Received {
            kind: inbound.kind,
            id: inbound.id,
            answers,
            response: inbound.response,
        });
    }

    async fn mark_disconnected(&self, reason: Option<String>) {
        let mut status = self.status.write().await;
        status.state = ConnectionState::Disconnected;
        status.last_error = reason;
    }
}

pub struct BridgeClient {
    shared: Shared,

    /// Frames queued for the writer task
    outgoing: mpsc::UnboundedSender<Message>,

    reader: Mutex<Option<JoinHandle<()>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl BridgeClient {
    /// Connect to the bridge, start the receive loop and send the initial ping.
    ///
    /// The returned receiver yields everything the client reports for the
    /// lifetime of the connection.
    pub async fn connect(
        url: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<BridgeEvent>), BridgeError> {
        info!("Connecting to terminal bridge at {}", url);

        let (ws_stream, response) = connect_async(url).await.map_err(|e| {
            error!("WebSocket handshake failed: {}", e);
            let text = e.to_string();
            if text.contains("refused") {
                error!("Connection refused - is the bridge listening on {}?", url);
            } else if text.contains("lookup") {
                error!("DNS/hostname lookup failed - check the URL: {}", url);
            }
            BridgeError::Connect {
                url: url.to_string(),
                source: Box::new(e),
            }
        })?;

        debug!("WebSocket response status: {:?}", response.status());
        info!("WebSocket connected successfully to {}", url);

        let (client, events) = Self::from_stream(url, ws_stream);
        client.ping().await?;
        Ok((client, events))
    }

    /// Wrap an already-open WebSocket stream. The client starts connected.
    pub fn from_stream<S>(url: &str, stream: S) -> (Self, mpsc::UnboundedReceiver<BridgeEvent>)
    where
        S: Stream<Item = Result<Message, tungstenite::Error>>
            + Sink<Message, Error = tungstenite::Error>
            + Send
            + 'static,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let shared = Shared::new(ConnectionStatus::connected(url), events_tx);

        let (ws_sender, ws_receiver) = stream.split();
        let writer = tokio::spawn(write_loop(ws_sender, outgoing_rx));
        let reader = tokio::spawn(receive_loop(ws_receiver, shared.clone()));

        let client = Self {
            shared,
            outgoing: outgoing_tx,
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(Some(writer)),
        };
        (client, events_rx)
    }

    /// Send an envelope of the given type. Returns the generated id.
    ///
    /// Rejected locally, without touching the channel, when disconnected.
    pub async fn send_message(&self, kind: &str, data: Payload) -> Result<String, BridgeError> {
        if !self.is_connected().await {
            warn!("Dropping {} request: not connected", kind);
            return Err(BridgeError::NotConnected);
        }

        let envelope = Envelope::new(kind, data);
        let json = envelope.to_json()?;

        self.shared
            .pending
            .lock()
            .await
            .insert(envelope.id.clone(), envelope.kind.clone());
        self.shared.emit(BridgeEvent::Sent {
            kind: envelope.kind.clone(),
            id: envelope.id.clone(),
        });

        if self.outgoing.send(Message::text(json)).is_err() {
            error!("Failed to queue outgoing {} message", kind);
            self.shared.pending.lock().await.remove(&envelope.id);
            return Err(BridgeError::ChannelClosed);
        }

        debug!("Sent message: {} (id: {})", envelope.kind, envelope.id);
        Ok(envelope.id)
    }

    pub async fn send(&self, request: Request) -> Result<String, BridgeError> {
        self.send_message(request.kind(), request.payload()).await
    }

    pub async fn ping(&self) -> Result<String, BridgeError> {
        self.send(Request::Ping).await
    }

    pub async fn create_terminal(&self, name: &str) -> Result<String, BridgeError> {
        self.send(Request::CreateTerminal {
            terminal_name: name.to_string(),
        })
        .await
    }

    /// Run a command. Without a terminal id the bridge picks one.
    pub async fn execute_command(
        &self,
        command: &str,
        terminal_id: Option<&str>,
    ) -> Result<String, BridgeError> {
        self.send(Request::Execute {
            command: command.to_string(),
            terminal_id: terminal_id.map(str::to_string),
        })
        .await
    }

    /// Ask the bridge to close a terminal and forget it locally straight away,
    /// whether or not the bridge confirms.
    pub async fn close_terminal(&self, terminal_id: &str) -> Result<String, BridgeError> {
        let result = self
            .send(Request::CloseTerminal {
                terminal_id: terminal_id.to_string(),
            })
            .await;

        if let Some(name) = self.shared.registry.write().await.remove(terminal_id) {
            debug!("Removed terminal {} ({}) from registry", name, terminal_id);
        }

        result
    }

    pub async fn get_status(&self) -> ConnectionStatus {
        self.shared.status.read().await.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.shared.status.read().await.is_connected()
    }

    /// Snapshot of the terminal registry
    pub async fn terminals(&self) -> Vec<TerminalEntry> {
        self.shared.registry.read().await.iter().cloned().collect()
    }

    pub async fn has_terminal(&self, terminal_id: &str) -> bool {
        self.shared.registry.read().await.contains(terminal_id)
    }

    /// Number of sent requests no response has echoed yet
    pub async fn pending_requests(&self) -> usize {
        self.shared.pending.lock().await.len()
    }

    /// Best-effort close: queue a close frame, give the writer a moment to
    /// flush it, then stop both tasks.
    pub async fn disconnect(&self) {
        info!("Disconnecting bridge client");

        let was_connected = {
            let mut status = self.shared.status.write().await;
            let was_connected = status.is_connected();
            status.state = ConnectionState::Disconnected;
            was_connected
        };

        if let Some(reader) = self.reader.lock().await.take() {
            reader.abort();
        }

        if was_connected && self.outgoing.send(Message::Close(None)).is_err() {
            debug!("Writer already gone, skipping close frame");
        }

        if let Some(mut writer) = self.writer.lock().await.take() {
            if timeout(CLOSE_GRACE, &mut writer).await.is_err() {
                warn!("Close frame not flushed in time");
                writer.abort();
            }
        }
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        for slot in [self.reader.get_mut(), self.writer.get_mut()] {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

async fn write_loop<W>(mut ws_sender: W, mut outgoing: mpsc::UnboundedReceiver<Message>)
where
    W: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    while let Some(message) = outgoing.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = ws_sender.send(message).await {
            error!("Failed to send WebSocket message: {}", e);
            break;
        }
        if closing {
            break;
        }
    }

    if let Err(e) = ws_sender.close().await {
        debug!("WebSocket sink close: {}", e);
    }
}

async fn receive_loop<R>(mut ws_receiver: R, shared: Shared)
where
    R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let reason = loop {
        match ws_receiver.next().await {
            Some(Ok(Message::Text(text))) => shared.handle_text(text.as_str()).await,
            Some(Ok(Message::Close(frame))) => {
                info!("WebSocket closed by server");
                break frame
                    .map(|f| f.reason.as_str().to_string())
                    .filter(|reason| !reason.is_empty());
            }
            Some(Ok(_)) => {
                // Binary, Ping, Pong and raw frames carry nothing for us
            }
            Some(Err(e)) => {
                error!("WebSocket error: {}", e);
                break Some(e.to_string());
            }
            None => {
                info!("WebSocket stream ended");
                break None;
            }
        }
    };

    shared.mark_disconnected(reason.clone()).await;
    shared.emit(BridgeEvent::Disconnected { reason });
}

#[cfg(test)]
impl BridgeClient {
    /// Client with no socket behind it: frames land in the returned receiver
    fn detached(
        state: ConnectionState,
    ) -> (
        Self,
        mpsc::UnboundedReceiver<Message>,
        mpsc::UnboundedReceiver<BridgeEvent>,
    ) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let mut status = ConnectionStatus::connected(DEFAULT_URL);
        status.state = state;

        let client = Self {
            shared: Shared::new(status, events_tx),
            outgoing: outgoing_tx,
            reader: Mutex::new(None),
            writer: Mutex::new(None),
        };
        (client, outgoing_rx, events_rx)
    }
}
