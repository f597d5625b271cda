//! # hostdeck-client - Printer Host Communication
//!
//! Everything that talks to the printer host server lives here:
//!
//! - [`ApiClient`] - async HTTP client for the host's command and query
//!   endpoints (connection control, jog/custom commands, file management,
//!   timelapse configuration, G-code downloads)
//! - [`PushChannel`] - WebSocket client for the host's status push socket,
//!   with automatic exponential-backoff reconnection and a manual reconnect
//!   escape hatch
//!
//! Both are designed for a TEA-style application: the `ApiClient` is cheap to
//! clone into spawned tasks, and the `PushChannel` surfaces everything as
//! [`PushEvent`](hostdeck_core::PushEvent)s on an mpsc receiver that the event
//! loop drains.

pub mod api;
pub mod socket;

pub use api::{
    ApiClient, ConnectionOptions, Feedrates, FileListing, JogAxis, SpeedResponse, SpeedStructure,
    TimelapseResponse, TimelapseSettings,
};
pub use socket::{push_url, ChannelHandle, ConnectionState, PushChannel};
