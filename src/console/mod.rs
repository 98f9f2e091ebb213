// ABOUTME: Interactive text console for the terminal bridge client
// Menu parsing, output rendering and the prompt loop

pub mod menu;
pub mod render;
pub mod session;

pub use menu::{MenuChoice, MENU};
pub use session::{spawn_event_printer, Console, DEFAULT_TERMINAL_NAME};
