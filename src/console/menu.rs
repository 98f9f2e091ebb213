// ABOUTME: Text menu for the interactive console and parsing of menu selections

pub const MENU: &str = "
╔════════════════════════════════════════╗
║        Terminal Bridge Client          ║
╚════════════════════════════════════════╝

Commands:
  1 - Create new terminal
  2 - Execute command
  3 - Close terminal
  4 - List terminals
  5 - Send ping
  s - Show status
  q - Quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateTerminal,
    ExecuteCommand,
    CloseTerminal,
    ListTerminals,
    Ping,
    Status,
    Quit,
}

impl MenuChoice {
    /// Map a line of input to a selection; surrounding whitespace is ignored
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::CreateTerminal),
            "2" => Some(MenuChoice::ExecuteCommand),
            "3" => Some(MenuChoice::CloseTerminal),
            "4" => Some(MenuChoice::ListTerminals),
            "5" => Some(MenuChoice::Ping),
            "s" => Some(MenuChoice::Status),
            "q" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}
