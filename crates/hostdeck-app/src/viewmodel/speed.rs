//! Print speed panel state.

use hostdeck_client::api::{Feedrates, SpeedStructure};
use hostdeck_core::push::StatusPayload;

use crate::handler::Task;

use super::{PushConsumer, UpdateCx};

/// View-model for the per-structure feedrate panel.
///
/// Displayed values always mirror the host's last speed response. A response
/// without a `feedrate` object (printer disconnected) clears all four so no
/// stale numbers linger.
#[derive(Debug)]
pub struct SpeedVm {
    pub outer_wall: Option<u32>,
    pub inner_wall: Option<u32>,
    pub fill: Option<u32>,
    pub support: Option<u32>,
    /// Structure the input field applies to.
    pub selected: SpeedStructure,
    /// Value to send, in mm/min.
    pub input: u32,
}

impl Default for SpeedVm {
    fn default() -> Self {
        Self {
            outer_wall: None,
            inner_wall: None,
            fill: None,
            support: None,
            selected: SpeedStructure::OuterWall,
            input: 0,
        }
    }
}

impl SpeedVm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a speed response. `None` feedrates clear every field.
    pub fn apply_response(&mut self, feedrates: Option<Feedrates>) {
        let feedrates = feedrates.unwrap_or_default();
        self.outer_wall = feedrates.outer_wall;
        self.inner_wall = feedrates.inner_wall;
        self.fill = feedrates.fill;
        self.support = feedrates.support;
    }

    /// Displayed value for one structure.
    pub fn value_of(&self, structure: SpeedStructure) -> Option<u32> {
        match structure {
            SpeedStructure::OuterWall => self.outer_wall,
            SpeedStructure::InnerWall => self.inner_wall,
            SpeedStructure::Fill => self.fill,
            SpeedStructure::Support => self.support,
        }
    }

    pub fn cycle_field(&mut self) {
        self.selected = match self.selected {
            SpeedStructure::OuterWall => SpeedStructure::InnerWall,
            SpeedStructure::InnerWall => SpeedStructure::Fill,
            SpeedStructure::Fill => SpeedStructure::Support,
            SpeedStructure::Support => SpeedStructure::OuterWall,
        };
    }

    pub fn adjust_input(&mut self, delta: i32) {
        self.input = self.input.saturating_add_signed(delta);
    }

    /// Build the set-speed request for the selected structure and reset the
    /// input field.
    pub fn send_task(&mut self) -> Task {
        let task = Task::SetSpeed {
            structure: self.selected,
            value: self.input,
        };
        self.input = 0;
        task
    }
}

impl PushConsumer for SpeedVm {
    // Feedrates come from their own endpoint, not from status frames; the
    // shared printer flags cover everything else this panel needs.
    fn apply_live_update(&mut self, _payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {}
}
