// ABOUTME: Library crate for the terminal bridge client exposing its API for testing and embedding

pub mod bridge;
pub mod config;
pub mod console;
pub mod logging;
