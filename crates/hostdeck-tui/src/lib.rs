//! hostdeck-tui - Terminal UI for HostDeck
//!
//! This crate renders the panels from hostdeck-app with ratatui and drives
//! the TEA loop: terminal key presses and push-channel events become
//! messages, update results become spawned background tasks.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod signals;
pub mod theme;
pub mod widgets;

// Re-export main entry point
pub use runner::run;
