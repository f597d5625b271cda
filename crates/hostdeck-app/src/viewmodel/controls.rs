//! Movement and custom controls panel state.
//!
//! The host defines a tree of custom controls (sections, one-shot commands,
//! parametric commands with editable inputs). The tree is ingested once per
//! fetch, flattened for cursor navigation, and edited in place.

use hostdeck_core::types::{ControlDefinition, ControlInput};
use serde_json::Value;

use crate::handler::Task;
use hostdeck_core::push::StatusPayload;

use super::{PushConsumer, UpdateCx};

/// Selectable jog step sizes in millimetres.
pub const JOG_DISTANCES: [f64; 4] = [0.1, 1.0, 10.0, 100.0];

/// One row of the flattened controls tree.
#[derive(Debug, Clone, Copy)]
pub struct ControlNode<'a> {
    /// Nesting depth, for indentation.
    pub depth: usize,
    pub control: &'a ControlDefinition,
}

impl ControlNode<'_> {
    /// Which row template renders this node. Unknown node types render as
    /// an empty row rather than breaking the tree.
    pub fn template(&self) -> &'static str {
        match self.control {
            ControlDefinition::Section { .. } => "section",
            ControlDefinition::Command { .. } => "command",
            ControlDefinition::ParametricCommand { .. } => "parametric_command",
            ControlDefinition::Unknown => "empty",
        }
    }
}

/// View-model for the controls panel.
#[derive(Debug)]
pub struct ControlsVm {
    controls: Vec<ControlDefinition>,
    jog_index: usize,
    /// Cursor into the flattened tree.
    pub cursor: usize,
    /// Input being edited inside the parametric command under the cursor.
    pub focused_input: usize,
    pub editing: bool,
}

impl Default for ControlsVm {
    fn default() -> Self {
        Self {
            controls: Vec::new(),
            // 1 mm steps until the user picks otherwise.
            jog_index: 1,
            cursor: 0,
            focused_input: 0,
            editing: false,
        }
    }
}

impl ControlsVm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a fetched controls tree.
    ///
    /// Every parametric input's live `value` slot is seeded from its
    /// default, sections recursively. Navigation state resets.
    pub fn set_controls(&mut self, mut controls: Vec<ControlDefinition>) {
        seed_defaults(&mut controls);
        self.controls = controls;
        self.cursor = 0;
        self.focused_input = 0;
        self.editing = false;
    }

    pub fn controls(&self) -> &[ControlDefinition] {
        &self.controls
    }

    /// The tree flattened depth-first, as the panel lists it.
    pub fn visible_nodes(&self) -> Vec<ControlNode<'_>> {
        let mut out = Vec::new();
        flatten(&self.controls, 0, &mut out);
        out
    }

    pub fn node_count(&self) -> usize {
        count(&self.controls)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let last = self.node_count().saturating_sub(1);
        if self.cursor < last {
            self.cursor += 1;
        }
    }

    /// Fire the control under the cursor. Sections and unknown nodes do
    /// nothing; parametric commands send their current input values.
    pub fn activate(&self) -> Option<Task> {
        let mut counter = 0;
        match find(&self.controls, self.cursor, &mut counter)? {
            ControlDefinition::Command { command, .. } => Some(Task::SendCommand {
                command: command.clone(),
            }),
            ControlDefinition::ParametricCommand { command, input, .. } => {
                let parameters = input
                    .iter()
                    .map(|i| (i.parameter.clone(), i.value_text()))
                    .collect();
                Some(Task::SendParametricCommand {
                    command: command.clone(),
                    parameters,
                })
            }
            ControlDefinition::Section { .. } | ControlDefinition::Unknown => None,
        }
    }

    /// Enter input editing on the parametric command under the cursor.
    /// Returns whether editing actually started.
    pub fn begin_edit(&mut self) -> bool {
        let has_inputs = {
            let mut counter = 0;
            matches!(
                find(&self.controls, self.cursor, &mut counter),
                Some(ControlDefinition::ParametricCommand { input, .. }) if !input.is_empty()
            )
        };
        if has_inputs {
            self.editing = true;
            self.focused_input = 0;
        }
        has_inputs
    }

    pub fn end_edit(&mut self) {
        self.editing = false;
    }

    pub fn toggle_edit(&mut self) {
        if self.editing {
            self.end_edit();
        } else {
            self.begin_edit();
        }
    }

    pub fn focus_next_input(&mut self) {
        if let Some(inputs) = self.current_inputs() {
            if !inputs.is_empty() {
                self.focused_input = (self.focused_input + 1) % inputs.len();
            }
        }
    }

    pub fn focus_prev_input(&mut self) {
        if let Some(inputs) = self.current_inputs() {
            let len = inputs.len();
            if len > 0 {
                self.focused_input = (self.focused_input + len - 1) % len;
            }
        }
    }

    pub fn input_push_char(&mut self, c: char) {
        let focused = self.focused_input;
        if let Some(input) = self.current_inputs_mut().and_then(|inputs| inputs.get_mut(focused)) {
            let mut text = input.value_text();
            text.push(c);
            input.value = Value::String(text);
        }
    }

    pub fn input_backspace(&mut self) {
        let focused = self.focused_input;
        if let Some(input) = self.current_inputs_mut().and_then(|inputs| inputs.get_mut(focused)) {
            let mut text = input.value_text();
            text.pop();
            input.value = Value::String(text);
        }
    }

    pub fn jog_distance(&self) -> f64 {
        JOG_DISTANCES[self.jog_index]
    }

    pub fn cycle_jog_distance(&mut self) {
        self.jog_index = (self.jog_index + 1) % JOG_DISTANCES.len();
    }

    fn current_inputs(&self) -> Option<&Vec<ControlInput>> {
        let mut counter = 0;
        match find(&self.controls, self.cursor, &mut counter) {
            Some(ControlDefinition::ParametricCommand { input, .. }) => Some(input),
            _ => None,
        }
    }

    fn current_inputs_mut(&mut self) -> Option<&mut Vec<ControlInput>> {
        let mut counter = 0;
        match find_mut(&mut self.controls, self.cursor, &mut counter) {
            Some(ControlDefinition::ParametricCommand { input, .. }) => Some(input),
            _ => None,
        }
    }
}

impl PushConsumer for ControlsVm {
    // Button availability follows the shared printer flags; frames carry
    // nothing else this panel needs.
    fn apply_live_update(&mut self, _payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {}
}

fn seed_defaults(controls: &mut [ControlDefinition]) {
    for control in controls {
        match control {
            ControlDefinition::ParametricCommand { input, .. } => {
                for i in input {
                    i.value = i.default_value.clone();
                }
            }
            ControlDefinition::Section { children, .. } => seed_defaults(children),
            _ => {}
        }
    }
}

fn flatten<'a>(nodes: &'a [ControlDefinition], depth: usize, out: &mut Vec<ControlNode<'a>>) {
    for control in nodes {
        out.push(ControlNode { depth, control });
        if let ControlDefinition::Section { children, .. } = control {
            flatten(children, depth + 1, out);
        }
    }
}

fn count(nodes: &[ControlDefinition]) -> usize {
    let mut total = 0;
    for node in nodes {
        total += 1;
        if let ControlDefinition::Section { children, .. } = node {
            total += count(children);
        }
    }
    total
}

fn find<'a>(
    nodes: &'a [ControlDefinition],
    target: usize,
    counter: &mut usize,
) -> Option<&'a ControlDefinition> {
    for node in nodes {
        if *counter == target {
            return Some(node);
        }
        *counter += 1;
        if let ControlDefinition::Section { children, .. } = node {
            if let Some(found) = find(children, target, counter) {
                return Some(found);
            }
        }
    }
    None
}

fn find_mut<'a>(
    nodes: &'a mut [ControlDefinition],
    target: usize,
    counter: &mut usize,
) -> Option<&'a mut ControlDefinition> {
    for node in nodes {
        if *counter == target {
            return Some(node);
        }
        *counter += 1;
        if let ControlDefinition::Section { children, .. } = node {
            if let Some(found) = find_mut(children, target, counter) {
                return Some(found);
            }
        }
    }
    None
}
