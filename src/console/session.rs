// ABOUTME: Interactive menu loop driving a BridgeClient from lines of text input
// Generic over the input and output streams so tests can script a whole session

use crate::bridge::{BridgeClient, BridgeError, BridgeEvent};
use crate::console::menu::{MenuChoice, MENU};
use crate::console::render;
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Name used when the operator leaves the terminal name blank
pub const DEFAULT_TERMINAL_NAME: &str = "MCP Terminal";

pub struct Console<R, W> {
    client: Arc<BridgeClient>,
    input: Lines<R>,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(client: Arc<BridgeClient>, input: R, output: W) -> Self {
        Self {
            client,
            input: input.lines(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `q` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.say(MENU).await?;

        loop {
            let Some(line) = self.prompt("\nEnter command: ").await? else {
                debug!("Input closed");
                break;
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                self.say("❌ Invalid command").await?;
                self.say(MENU).await?;
                continue;
            };

            info!("Menu selection: {:?}", choice);
            match choice {
                MenuChoice::CreateTerminal => self.create_terminal().await?,
                MenuChoice::ExecuteCommand => self.execute_command().await?,
                MenuChoice::CloseTerminal => self.close_terminal().await?,
                MenuChoice::ListTerminals => {
                    self.list_terminals().await?;
                    self.say(MENU).await?;
                }
                MenuChoice::Ping => {
                    let result = self.client.ping().await;
                    self.report(result).await?;
                }
                MenuChoice::Status => self.show_status().await?,
                MenuChoice::Quit => break,
            }
        }

        self.say("\n👋 Goodbye!").await?;
        Ok(())
    }

    async fn create_terminal(&mut self) -> Result<()> {
        let name = self.prompt("Terminal name: ").await?.unwrap_or_default();
        let name = if name.trim().is_empty() {
            DEFAULT_TERMINAL_NAME.to_string()
        } else {
            name
        };
        let result = self.client.create_terminal(&name).await;
        self.report(result).await
    }

    async fn execute_command(&mut self) -> Result<()> {
        if self.client.terminals().await.is_empty() {
            self.say("❌ No terminals available. Create one first.").await?;
            return self.say(MENU).await;
        }

        self.list_terminals().await?;
        let terminal_id = self
            .prompt("Terminal ID (or press Enter for default): ")
            .await?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        let command = self
            .prompt("Command to execute: ")
            .await?
            .unwrap_or_default();

        let result = self
            .client
            .execute_command(&command, terminal_id.as_deref())
            .await;
        self.report(result).await
    }

    async fn close_terminal(&mut self) -> Result<()> {
        if self.client.terminals().await.is_empty() {
            self.say("❌ No terminals available.").await?;
            return self.say(MENU).await;
        }

        self.list_terminals().await?;
        let terminal_id = self
            .prompt("Terminal ID to close: ")
            .await?
            .unwrap_or_default();
        let terminal_id = terminal_id.trim();

        if self.client.has_terminal(terminal_id).await {
            let result = self.client.close_terminal(terminal_id).await;
            self.report(result).await
        } else {
            self.say("❌ Invalid terminal ID").await?;
            self.say(MENU).await
        }
    }

    async fn list_terminals(&mut self) -> Result<()> {
        let terminals = self.client.terminals().await;
        self.say_lines(&render::terminal_list_lines(&terminals)).await
    }

    async fn show_status(&mut self) -> Result<()> {
        let status = self.client.get_status().await;
        let terminals = self.client.terminals().await.len();
        let pending = self.client.pending_requests().await;
        self.say_lines(&render::status_lines(&status, terminals, pending))
            .await
    }

    /// Local send failures are shown to the operator, never propagated
    async fn report(&mut self, result: Result<String, BridgeError>) -> Result<()> {
        match result {
            Ok(id) => {
                debug!("Request queued with id {}", id);
                Ok(())
            }
            Err(BridgeError::NotConnected) => self.say("❌ Not connected to server").await,
            Err(e) => self.say(&format!("Error: {e}")).await,
        }
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.flush().await?;
        Ok(self.input.next_line().await?)
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn say_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.say(line).await?;
        }
        Ok(())
    }
}

/// Print client events to stdout until the client goes away
pub fn spawn_event_printer(mut events: mpsc::UnboundedReceiver<BridgeEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            for line in render::event_lines(&event) {
                println!("{line}");
            }
            if event.is_disconnect() {
                break;
            }
        }
    })
}
