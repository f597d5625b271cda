//! Printer/job status panel state.

use hostdeck_core::push::StatusPayload;
use hostdeck_core::types::{GcodeProcessing, ProcessingMode};

use super::{PushConsumer, UpdateCx};

/// View-model for the job status panel.
///
/// Every field is overwritten wholesale from each status frame; the host is
/// authoritative and nothing here accumulates. Time and filament strings
/// arrive pre-formatted and are shown verbatim.
#[derive(Debug, Default)]
pub struct PrinterVm {
    pub filename: Option<String>,
    pub filament: Option<String>,
    pub estimated_print_time: Option<String>,
    pub print_time: Option<String>,
    pub print_time_left: Option<String>,
    /// G-code line currently being printed.
    pub current_line: Option<u64>,
    /// Total G-code lines of the loaded job.
    pub total_lines: Option<u64>,
    pub current_z: Option<f64>,
    /// Server-side file processing phase, present while the host loads or
    /// parses a file.
    pub processing: Option<GcodeProcessing>,
}

impl PrinterVm {
    pub fn new() -> Self {
        Self::default()
    }

    /// "current / total" line display. A missing or zero total renders as
    /// a bare dash; a missing current line becomes a dash placeholder.
    pub fn line_string(&self) -> String {
        let total = match self.total_lines {
            Some(total) if total > 0 => total,
            _ => return "-".to_string(),
        };
        match self.current_line {
            Some(current) if current > 0 => format!("{current} / {total}"),
            _ => format!("- / {total}"),
        }
    }

    /// Job completion in whole percent, 0 when either line count is unknown.
    pub fn progress_percent(&self) -> u16 {
        match (self.current_line, self.total_lines) {
            (Some(current), Some(total)) if current > 0 && total > 0 => {
                (current as f64 * 100.0 / total as f64).round() as u16
            }
            _ => 0,
        }
    }

    /// Label for the pause/continue action in the current state.
    pub fn pause_label(&self, paused: bool) -> &'static str {
        if paused {
            "Continue"
        } else {
            "Pause"
        }
    }

    /// Filename line, replaced by a load/parse progress string while the
    /// host is still processing the selected file.
    pub fn display_filename(&self, loading: bool) -> String {
        if loading {
            if let Some(processing) = &self.processing {
                let percent = (processing.progress.unwrap_or(0.0) * 100.0).round() as i64;
                match processing.mode {
                    Some(ProcessingMode::Loading) => return format!("Loading... ({percent}%)"),
                    Some(ProcessingMode::Parsing) => return format!("Parsing... ({percent}%)"),
                    _ => {}
                }
            }
        }
        self.filename.clone().unwrap_or_else(|| "-".to_string())
    }
}

impl PushConsumer for PrinterVm {
    fn apply_live_update(&mut self, payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {
        self.filename = payload.job.filename.clone();
        self.filament = payload.job.filament.clone();
        self.estimated_print_time = payload.job.estimated_print_time.clone();
        self.total_lines = payload.job.lines;
        self.print_time = payload.progress.print_time.clone();
        self.print_time_left = payload.progress.print_time_left.clone();
        self.current_line = payload.progress.progress;
        self.current_z = payload.current_z;
        self.processing = payload.gcode;
    }
}
