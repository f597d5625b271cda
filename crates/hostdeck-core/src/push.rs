//! Push channel frames and events
//!
//! The host pushes status over a persistent socket as JSON text frames with a
//! single top-level tag: `{"current": {...}}` for incremental updates and
//! `{"history": {...}}` for the full replay sent right after (re)connecting.
//! Both carry the same payload shape; they differ in which sub-fields are
//! populated and in replace-vs-append semantics downstream.

use serde::Deserialize;

use crate::error::Result;
use crate::types::{
    GcodeProcessing, JobInfo, PrinterState, ProgressInfo, TemperatureSample, TemperatureSeries,
};

/// Payload of a `current` or `history` frame.
///
/// Every consumer extracts only the sub-fields it cares about, so all of them
/// tolerate absence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusPayload {
    pub state: PrinterState,
    pub job: JobInfo,
    pub progress: ProgressInfo,
    pub gcode: Option<GcodeProcessing>,
    pub current_z: Option<f64>,
    /// Live samples since the previous frame (`current` frames)
    pub temperatures: Vec<TemperatureSample>,
    /// Full series replay (`history` frames)
    pub temperature_history: Option<TemperatureSeries>,
    /// Terminal lines since the previous frame (`current` frames)
    pub logs: Vec<String>,
    /// Full terminal replay (`history` frames)
    pub log_history: Option<Vec<String>>,
}

/// One parsed frame from the push socket
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PushFrame {
    Current(StatusPayload),
    History(StatusPayload),
}

impl PushFrame {
    pub fn payload(&self) -> &StatusPayload {
        match self {
            PushFrame::Current(payload) | PushFrame::History(payload) => payload,
        }
    }

    pub fn is_history(&self) -> bool {
        matches!(self, PushFrame::History(_))
    }
}

/// Everything the push channel reports to the application
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Socket established (first connect and every reconnect)
    Connected,
    /// Socket dropped; automatic reconnection is under way
    Disconnected,
    /// Automatic reconnection gave up
    ReconnectFailed,
    /// A parsed status frame
    Frame(PushFrame),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFrame {
    Known(PushFrame),
    Unknown(serde_json::Value),
}

/// Parse one text frame from the push socket.
///
/// Frames whose top-level tag we don't recognize come back as `None` so that
/// a host with newer message kinds doesn't tear down the connection.
pub fn parse_frame(text: &str) -> Result<Option<PushFrame>> {
    match serde_json::from_str::<RawFrame>(text)? {
        RawFrame::Known(frame) => Ok(Some(frame)),
        RawFrame::Unknown(value) => {
            tracing::debug!("ignoring unrecognized push frame: {}", value);
            Ok(None)
        }
    }
}
