//! Per-panel view-models.
//!
//! Each panel of the UI owns one view-model: a plain struct holding the
//! panel's display state plus the reducer methods that mutate it. Status
//! frames from the push channel are fanned out to every view-model through
//! the [`PushConsumer`] trait; direct user input goes through panel-specific
//! methods called from the update handler.
//!
//! View-models never perform IO. When applying a frame requires a follow-up
//! request (refreshing the timelapse list, downloading a G-code file) the
//! consumer enqueues a [`Task`](crate::handler::Task) on the [`UpdateCx`] and
//! the handler layer spawns it.

mod connection;
mod controls;
mod files;
mod gcode;
mod printer;
mod speed;
mod temperature;
mod terminal;
mod webcam;

pub use connection::ConnectionVm;
pub use controls::{ControlNode, ControlsVm, JOG_DISTANCES};
pub use files::{FilesVm, PageEntry};
pub use gcode::{GcodeVm, LoadStatus};
pub use printer::PrinterVm;
pub use speed::SpeedVm;
pub use temperature::{axis_label, TempTarget, TemperatureVm};
pub use terminal::TerminalVm;
pub use webcam::WebcamVm;

use hostdeck_core::push::StatusPayload;

use crate::handler::Task;
use crate::state::FlagsStore;

/// Context handed to every [`PushConsumer`] during frame fan-out.
///
/// Exposes the already-updated printer flags (applied once, before fan-out)
/// and collects the tasks the consumers want spawned. The handler drains the
/// tasks into a single update action after all consumers have run.
pub struct UpdateCx<'a> {
    flags: &'a FlagsStore,
    tasks: Vec<Task>,
}

impl<'a> UpdateCx<'a> {
    pub fn new(flags: &'a FlagsStore) -> Self {
        Self {
            flags,
            tasks: Vec::new(),
        }
    }

    /// Printer state flags for the frame being applied.
    pub fn flags(&self) -> &FlagsStore {
        self.flags
    }

    /// Queue a task to be spawned after fan-out completes.
    pub fn enqueue(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Consume the context, yielding the queued tasks.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

/// A view-model that consumes push channel status frames.
///
/// Live frames carry the most recent printer state and incremental data
/// (new temperature samples, new log lines). History frames arrive once per
/// (re)connect and replay the server's retained buffers wholesale; consumers
/// that accumulate data override [`apply_snapshot_replay`] to replace instead
/// of append. Everyone else treats both the same.
///
/// [`apply_snapshot_replay`]: PushConsumer::apply_snapshot_replay
pub trait PushConsumer {
    /// Apply a live status frame.
    fn apply_live_update(&mut self, payload: &StatusPayload, cx: &mut UpdateCx<'_>);

    /// Apply a history frame. Defaults to the live behavior.
    fn apply_snapshot_replay(&mut self, payload: &StatusPayload, cx: &mut UpdateCx<'_>) {
        self.apply_live_update(payload, cx);
    }
}
