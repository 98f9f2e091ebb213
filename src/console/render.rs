// ABOUTME: Turns client events and state snapshots into console text
// Pure functions so the wording can be tested without a terminal

use crate::bridge::{BridgeEvent, ConnectionStatus, Response, TerminalEntry};

fn or_none(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}

pub fn event_lines(event: &BridgeEvent) -> Vec<String> {
    match event {
        BridgeEvent::Sent { kind, .. } => vec![String::new(), format!("📤 Sending: {kind}")],
        BridgeEvent::Received {
            kind,
            id,
            answers,
            response,
        } => {
            let mut header = format!("📨 Response: {} (id: {})", or_none(kind), or_none(id));
            if let Some(request) = answers {
                header.push_str(&format!(" in reply to {request}"));
            }

            let mut lines = vec![String::new(), header];
            match response {
                Response::Pong => lines.push("🏓 Pong received - connection is alive".into()),
                Response::TerminalCreated {
                    terminal_id,
                    terminal_name,
                } => {
                    lines.push(format!("✅ Terminal created: \"{terminal_name}\""));
                    lines.push(format!("   Terminal ID: {terminal_id}"));
                }
                Response::Success { output } => lines.push(format!("✅ Success: {output}")),
                Response::Error { error } => lines.push(format!("❌ Error: {error}")),
                Response::Unknown(raw) => lines.push(format!("📦 Unknown response type: {raw}")),
            }
            lines
        }
        BridgeEvent::Malformed(e) => vec![format!("Failed to parse message: {e}")],
        BridgeEvent::Disconnected { reason } => {
            let mut line = "❌ Disconnected from server".to_string();
            if let Some(reason) = reason {
                line.push_str(&format!(" ({reason})"));
            }
            vec![String::new(), line]
        }
    }
}

pub fn terminal_list_lines(terminals: &[TerminalEntry]) -> Vec<String> {
    let mut lines = vec![String::new(), "📋 Active Terminals:".to_string()];
    if terminals.is_empty() {
        lines.push("   (none)".to_string());
    } else {
        lines.extend(
            terminals
                .iter()
                .map(|t| format!("   - {} (ID: {})", t.name, t.id)),
        );
    }
    lines
}

pub fn status_lines(status: &ConnectionStatus, terminals: usize, pending: usize) -> Vec<String> {
    let state = if status.is_connected() {
        "Connected"
    } else {
        "Disconnected"
    };

    let mut lines = vec![
        String::new(),
        "Terminal Bridge Status:".to_string(),
        format!("- Connection: {state}"),
        format!("- Server URL: {}", status.url),
        format!("- Active Terminals: {terminals}"),
        format!("- Awaiting Replies: {pending}"),
    ];
    if let Some(error) = &status.last_error {
        lines.push(format!("- Last Error: {error}"));
    }
    lines
}

/// Cause plus remediation checklist shown when the first connect fails
pub fn connection_failure_lines(error: &dyn std::fmt::Display, url: &str) -> Vec<String> {
    vec![
        format!("❌ Connection error: {error}"),
        String::new(),
        "💡 Make sure:".to_string(),
        "  1. The editor hosting the terminal bridge is running".to_string(),
        "  2. The terminal bridge extension is installed and active".to_string(),
        format!("  3. The bridge is listening on {url}"),
    ]
}
