//! hostdeck-app - Application state and orchestration for HostDeck
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management: printer/host state lives in view-model structs inside
//! [`AppState`], every input (key press, push frame, task completion) is a
//! [`Message`], and the pure [`handler::update`] function maps messages to
//! state changes plus [`UpdateAction`]s for the event loop to execute.
//!
//! Status frames pushed by the host fan out to the view-models through the
//! [`viewmodel::PushConsumer`] trait in a fixed order, so no view-model ever
//! observes a half-applied snapshot.

pub mod actions;
pub mod config;
pub mod gcode_render;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod state;
pub mod viewmodel;

// Re-export primary types
pub use handler::{Task, UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppState, FlagsStore, OfflineNotice, UiTab};

// Re-export client types the TUI needs for bootstrap
pub use hostdeck_client::{ApiClient, ChannelHandle, PushChannel};
