//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `push`: Push channel event handling and status frame fan-out
//! - `keys`: Key event handlers per panel tab

pub(crate) mod keys;
pub(crate) mod push;
pub(crate) mod update;

#[cfg(test)]
mod tests;

use hostdeck_client::api::{JogAxis, SpeedStructure};
use hostdeck_core::types::TimelapseMode;

use crate::message::Message;

// Re-export main entry point
pub use update::update;

// Re-export functions used by internal tests
#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Spawn a background task
    SpawnTask(Task),

    /// Spawn several background tasks
    SpawnTasks(Vec<Task>),

    /// Force the push channel to redial immediately
    ReconnectChannel,
}

/// Background tasks to spawn
///
/// Every task maps to one host API call. Fetches report back through a
/// `*Loaded` message; command sends are fire-and-forget and rely on the
/// next status frame to reflect their effect.
#[derive(Debug, Clone)]
pub enum Task {
    /// Fetch serial port/baudrate options
    FetchConnectionOptions,

    /// Open the serial connection to the printer
    ConnectPrinter {
        port: Option<String>,
        baudrate: Option<u32>,
        save: bool,
    },

    /// Close the serial connection, then re-fetch the options
    DisconnectPrinter,

    /// Fetch the custom controls tree
    FetchControls,

    /// Move one axis by a signed distance in mm
    Jog { axis: JogAxis, distance: f64 },

    /// Home one axis
    Home { axis: JogAxis },

    /// Send a raw G-code command
    SendCommand { command: String },

    /// Send a templated command with parameter values
    SendParametricCommand {
        command: String,
        parameters: Vec<(String, String)>,
    },

    /// Start printing the loaded job
    StartPrint,

    /// Pause or resume the running job
    PausePrint,

    /// Cancel the running job
    CancelPrint,

    /// Set the hotend target temperature
    SetHotendTemperature { celsius: f64 },

    /// Set the bed target temperature
    SetBedTemperature { celsius: f64 },

    /// Fetch the per-structure feedrates
    FetchSpeed,

    /// Set one structure's feedrate
    SetSpeed {
        structure: SpeedStructure,
        value: u32,
    },

    /// Fetch the G-code file listing
    FetchFiles,

    /// Load a file as the active job
    LoadFile { filename: String },

    /// Delete a file from the host
    DeleteFile { filename: String },

    /// Fetch timelapse mode, config and clip list
    FetchTimelapse,

    /// Save the timelapse configuration
    SaveTimelapseConfig {
        mode: TimelapseMode,
        interval: Option<u32>,
    },

    /// Delete a rendered timelapse clip
    DeleteTimelapse { filename: String },

    /// Download a G-code file for the viewer
    FetchGcodeFile {
        token: u64,
        filename: String,
        date: Option<i64>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Wrap queued fan-out tasks, collapsing the empty and single cases.
    pub fn tasks(mut tasks: Vec<Task>) -> Self {
        if tasks.len() > 1 {
            return Self::action(UpdateAction::SpawnTasks(tasks));
        }
        match tasks.pop() {
            Some(task) => Self::action(UpdateAction::SpawnTask(task)),
            None => Self::none(),
        }
    }
}
