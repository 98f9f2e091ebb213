// ABOUTME: Loopback terminal bridge used by the integration tests
// Accepts one WebSocket connection and hands it to a test-provided script

#![allow(dead_code)]

use bridge_client::bridge::{BridgeEvent, Envelope};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

pub type ServerSocket = WebSocketStream<TcpStream>;

/// Start a server for a single connection and return its ws:// URL
pub async fn spawn_bridge<F, Fut>(script: F) -> String
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept connection");
        let ws = tokio_tungstenite::accept_async(tcp)
            .await
            .expect("WebSocket handshake");
        script(ws).await;
    });

    format!("ws://{addr}")
}

/// Next request envelope the client sent, skipping control frames
pub async fn read_request(ws: &mut ServerSocket) -> Option<Envelope> {
    while let Some(frame) = ws.next().await {
        match frame.ok()? {
            Message::Text(text) => return serde_json::from_str(text.as_str()).ok(),
            Message::Close(_) => return None,
            _ => {}
        }
    }
    None
}

pub async fn send_text(ws: &mut ServerSocket, text: &str) {
    ws.send(Message::text(text.to_string()))
        .await
        .expect("server send");
}

/// Answer every request the way the editor-side bridge does, reporting each
/// request it sees on `seen`. Terminal ids are `t1`, `t2`, ...
pub async fn run_fake_bridge(mut ws: ServerSocket, seen: mpsc::UnboundedSender<Envelope>) {
    let mut terminals: Vec<String> = Vec::new();
    let mut next_terminal = 1;

    while let Some(request) = read_request(&mut ws).await {
        let reply = match request.kind.as_str() {
            "ping" => json!({"type": "pong", "id": &request.id}),
            "create_terminal" => {
                let terminal_id = format!("t{next_terminal}");
                next_terminal += 1;
                terminals.push(terminal_id.clone());
                let name = request
                    .data
                    .get("terminalName")
                    .and_then(|v| v.as_str())
                    .unwrap_or("MCP Terminal")
                    .to_string();
                json!({"type": "terminal_created", "id": &request.id,
                       "data": {"terminalId": terminal_id, "terminalName": name}})
            }
            "execute" => {
                let command = request.data.get("command").and_then(|v| v.as_str()).unwrap_or("");
                json!({"type": "success", "id": &request.id,
                       "data": {"output": format!("Command executed: {command}")}})
            }
            "close_terminal" => {
                let terminal_id = request
                    .data
                    .get("terminalId")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                if let Some(pos) = terminals.iter().position(|t| *t == terminal_id) {
                    terminals.remove(pos);
                    json!({"type": "success", "id": &request.id,
                           "data": {"output": format!("Terminal {terminal_id} closed")}})
                } else {
                    json!({"type": "error", "id": &request.id,
                           "data": {"error": format!("Terminal {terminal_id} not found")}})
                }
            }
            other => json!({"type": "error", "id": &request.id,
                            "data": {"error": format!("Unknown request type: {other}")}}),
        };

        let _ = seen.send(request);
        if ws.send(Message::text(reply.to_string())).await.is_err() {
            break;
        }
    }
}

/// Wait for the next client event, failing the test after a few seconds
pub async fn next_event(events: &mut mpsc::UnboundedReceiver<BridgeEvent>) -> BridgeEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for client event")
        .expect("event channel closed")
}

/// Skip events until one matches
pub async fn wait_for<P>(events: &mut mpsc::UnboundedReceiver<BridgeEvent>, mut predicate: P) -> BridgeEvent
where
    P: FnMut(&BridgeEvent) -> bool,
{
    loop {
        let event = next_event(events).await;
        if predicate(&event) {
            return event;
        }
    }
}
