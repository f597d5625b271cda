//! Rendering seam for the G-code viewer.
//!
//! The viewer view-model drives a [`GcodeRenderer`] implementation but never
//! looks inside it: loading a file yields a [`ModelSummary`], print progress
//! maps to a [`CmdIndex`], and layer/command ranges are handed back for
//! drawing. The actual toolpath engine is pluggable; [`NoopRenderer`] is the
//! built-in stand-in that keeps the rest of the application fully functional
//! without one.

use hostdeck_core::prelude::*;

#[cfg(test)]
use mockall::automock;

/// Options controlling how the viewer interprets and draws a model.
///
/// Mirrors the option checkboxes of the hosted web viewer; the view-model
/// pushes the whole struct down on every toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    /// Re-centre the model on the print bed.
    pub move_model: bool,
    /// Keep the viewport centred on the model when layers change.
    pub center_viewport: bool,
    /// Draw non-extruding travel moves.
    pub show_moves: bool,
    /// Draw retract/restart markers.
    pub show_retracts: bool,
    /// Ghost the next layer above the current one.
    pub show_next_layer: bool,
    /// Ghost the previous layer below the current one.
    pub show_previous_layer: bool,
    /// Zoom to fit the model when a file loads.
    pub zoom_on_model: bool,
    /// Sort layers by Z height instead of file order.
    pub sort_layers: bool,
    /// Drop layers that contain no extrusion.
    pub purge_empty_layers: bool,
    /// Line width used for extrusion moves, in tenths of a millimetre.
    pub extrusion_width: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            move_model: true,
            center_viewport: false,
            show_moves: true,
            show_retracts: true,
            show_next_layer: false,
            show_previous_layer: false,
            zoom_on_model: true,
            sort_layers: true,
            purge_empty_layers: true,
            extrusion_width: 4,
        }
    }
}

/// One viewer option that can be flipped from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerToggle {
    MoveModel,
    CenterViewport,
    ShowMoves,
    ShowRetracts,
    ShowNextLayer,
    ShowPreviousLayer,
    ZoomOnModel,
    SortLayers,
    PurgeEmptyLayers,
}

impl ViewerOptions {
    /// Flip one boolean option and return its new value.
    pub fn toggle(&mut self, which: ViewerToggle) -> bool {
        let flag = match which {
            ViewerToggle::MoveModel => &mut self.move_model,
            ViewerToggle::CenterViewport => &mut self.center_viewport,
            ViewerToggle::ShowMoves => &mut self.show_moves,
            ViewerToggle::ShowRetracts => &mut self.show_retracts,
            ViewerToggle::ShowNextLayer => &mut self.show_next_layer,
            ViewerToggle::ShowPreviousLayer => &mut self.show_previous_layer,
            ViewerToggle::ZoomOnModel => &mut self.zoom_on_model,
            ViewerToggle::SortLayers => &mut self.sort_layers,
            ViewerToggle::PurgeEmptyLayers => &mut self.purge_empty_layers,
        };
        *flag = !*flag;
        *flag
    }
}

/// Position within a parsed model: a layer and a command offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmdIndex {
    /// Zero-based layer index.
    pub layer: usize,
    /// Zero-based command index within the layer.
    pub cmd: usize,
}

/// Whole-model information produced when a file is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelSummary {
    /// Number of layers in the model.
    pub layer_count: usize,
    /// Total number of G-code commands.
    pub command_count: usize,
    /// Estimated filament use in millimetres, when the engine computes it.
    pub filament_mm: Option<f64>,
}

/// Per-layer information for the layer info panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSummary {
    /// Z height of the layer in millimetres.
    pub height_mm: Option<f64>,
    /// Number of commands in the layer.
    pub command_count: usize,
}

/// The toolpath engine behind the G-code viewer.
///
/// Implementations own all parsing and drawing. The view-model only ever
/// calls through this trait, so tests replace the engine with a mock and the
/// default build ships [`NoopRenderer`].
#[cfg_attr(test, automock)]
pub trait GcodeRenderer: Send {
    /// Parse a downloaded G-code file and make it the current model.
    fn load_file(&mut self, content: &str) -> Result<ModelSummary>;

    /// Apply changed viewer options to the current model.
    fn update_options(&mut self, options: &ViewerOptions);

    /// Map a print completion fraction (0.0..=1.0) to a position in the
    /// model, or `None` when no model is loaded.
    fn cmd_index_for_progress(&self, fraction: f64) -> Option<CmdIndex>;

    /// Draw one layer, restricted to the `first_cmd..=last_cmd` range.
    fn render(&mut self, layer: usize, first_cmd: usize, last_cmd: usize);

    /// Information about one layer of the current model.
    fn layer_summary(&self, layer: usize) -> Option<LayerSummary>;

    /// Drop the current model.
    fn clear(&mut self);
}

/// Placeholder engine used until a real toolpath renderer is wired in.
///
/// Counts commands so the info panel shows something truthful, but draws
/// nothing and knows nothing about layers.
#[derive(Debug, Default)]
pub struct NoopRenderer {
    loaded: bool,
    command_count: usize,
}

impl GcodeRenderer for NoopRenderer {
    fn load_file(&mut self, content: &str) -> Result<ModelSummary> {
        self.command_count = content
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with(';')
            })
            .count();
        self.loaded = true;
        Ok(ModelSummary {
            layer_count: 0,
            command_count: self.command_count,
            filament_mm: None,
        })
    }

    fn update_options(&mut self, _options: &ViewerOptions) {}

    fn cmd_index_for_progress(&self, _fraction: f64) -> Option<CmdIndex> {
        None
    }

    fn render(&mut self, _layer: usize, _first_cmd: usize, _last_cmd: usize) {}

    fn layer_summary(&self, _layer: usize) -> Option<LayerSummary> {
        None
    }

    fn clear(&mut self) {
        self.loaded = false;
        self.command_count = 0;
    }
}
