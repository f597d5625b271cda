//! G-code viewer panel state.
//!
//! Bridges print progress to a pluggable toolpath engine. The view-model
//! tracks which file the engine has loaded by (filename, date) identity,
//! auto-downloads the active job's file when the identity drifts, and while
//! printing drives the engine to the command index matching live progress.
//!
//! Downloads are token-stamped: each request carries a fresh token and only
//! a completion bearing the current token is applied, so a slow response for
//! a superseded file can never overwrite a newer load.

use hostdeck_core::push::StatusPayload;
use hostdeck_core::types::{FileOrigin, ProgressInfo};

use crate::gcode_render::{GcodeRenderer, LayerSummary, ModelSummary, ViewerOptions, ViewerToggle};
use crate::handler::Task;
use hostdeck_core::prelude::*;

use super::{PushConsumer, UpdateCx};

/// Auto-loading suspends after this many consecutive download or parse
/// failures, until a manual refresh.
const MAX_LOAD_FAILURES: u32 = 3;

/// Download state machine: one request in flight at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Request,
}

/// View-model for the G-code viewer panel.
pub struct GcodeVm {
    renderer: Box<dyn GcodeRenderer>,
    pub options: ViewerOptions,
    /// Identity of the file the engine currently has loaded.
    pub loaded_filename: Option<String>,
    pub loaded_file_date: Option<i64>,
    pub status: LoadStatus,
    pub error_count: u32,
    /// Follow live print progress instead of the manual layer selection.
    pub sync_progress: bool,
    pub model: Option<ModelSummary>,
    /// Currently rendered layer and command range.
    pub layer: usize,
    pub cmd_first: usize,
    pub cmd_last: usize,
    pub layer_info: Option<LayerSummary>,
    token_counter: u64,
    current_token: u64,
}

impl GcodeVm {
    pub fn new(renderer: Box<dyn GcodeRenderer>) -> Self {
        Self {
            renderer,
            options: ViewerOptions::default(),
            loaded_filename: None,
            loaded_file_date: None,
            status: LoadStatus::Idle,
            error_count: 0,
            sync_progress: true,
            model: None,
            layer: 0,
            cmd_first: 0,
            cmd_last: 0,
            layer_info: None,
            token_counter: 0,
            current_token: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Request
    }

    /// Whether repeated failures have suspended auto-loading.
    pub fn auto_load_suspended(&self) -> bool {
        self.error_count >= MAX_LOAD_FAILURES
    }

    /// Apply a finished download. Stale tokens are discarded outright.
    pub fn complete_load(
        &mut self,
        token: u64,
        filename: String,
        date: Option<i64>,
        content: &str,
    ) {
        if token != self.current_token {
            debug!(filename, "discarding stale gcode download");
            return;
        }
        self.status = LoadStatus::Idle;
        match self.renderer.load_file(content) {
            Ok(summary) => {
                debug!(
                    filename,
                    layers = summary.layer_count,
                    commands = summary.command_count,
                    "gcode model loaded"
                );
                self.loaded_filename = Some(filename);
                self.loaded_file_date = date;
                self.error_count = 0;
                self.layer = 0;
                self.cmd_first = 0;
                self.layer_info = self.renderer.layer_summary(0);
                self.cmd_last = self
                    .layer_info
                    .as_ref()
                    .map(|info| info.command_count.saturating_sub(1))
                    .unwrap_or(0);
                self.model = Some(summary);
            }
            Err(err) => {
                warn!(filename, error = %err, "gcode model failed to load");
                self.error_count += 1;
            }
        }
    }

    /// Record a failed download. Stale tokens are discarded outright.
    pub fn fail_load(&mut self, token: u64) {
        if token != self.current_token {
            return;
        }
        self.status = LoadStatus::Idle;
        self.error_count += 1;
    }

    /// Re-arm auto-loading after it suspended on repeated failures.
    pub fn refresh(&mut self) {
        self.error_count = 0;
        self.status = LoadStatus::Idle;
    }

    /// Step the rendered layer manually. Leaves progress-sync off so the
    /// next status frame doesn't snap the view back.
    pub fn move_layer(&mut self, delta: i32) {
        let layer_count = match &self.model {
            Some(model) if model.layer_count > 0 => model.layer_count,
            _ => return,
        };
        let layer = self
            .layer
            .saturating_add_signed(delta as isize)
            .min(layer_count - 1);

        self.sync_progress = false;
        self.layer = layer;
        self.layer_info = self.renderer.layer_summary(layer);
        self.cmd_first = 0;
        self.cmd_last = self
            .layer_info
            .as_ref()
            .map(|info| info.command_count.saturating_sub(1))
            .unwrap_or(0);
        self.renderer.render(layer, self.cmd_first, self.cmd_last);
    }

    pub fn toggle_sync(&mut self) {
        self.sync_progress = !self.sync_progress;
    }

    /// Flip one viewer option and push the new set down to the engine.
    pub fn toggle_option(&mut self, which: ViewerToggle) {
        self.options.toggle(which);
        self.renderer.update_options(&self.options);
    }

    fn is_loaded(&self, filename: &str, date: Option<i64>) -> bool {
        self.loaded_filename.as_deref() == Some(filename) && self.loaded_file_date == date
    }

    fn clear_model(&mut self) {
        self.renderer.clear();
        self.loaded_filename = None;
        self.loaded_file_date = None;
        self.model = None;
        self.layer = 0;
        self.cmd_first = 0;
        self.cmd_last = 0;
        self.layer_info = None;
    }

    fn request_load(&mut self, filename: String, date: Option<i64>, cx: &mut UpdateCx<'_>) {
        self.token_counter += 1;
        self.current_token = self.token_counter;
        self.status = LoadStatus::Request;
        debug!(filename, token = self.current_token, "requesting gcode download");
        cx.enqueue(Task::FetchGcodeFile {
            token: self.current_token,
            filename,
            date,
        });
    }

    fn sync_to_progress(&mut self, progress: &ProgressInfo, total_lines: Option<u64>) {
        let (Some(current), Some(total)) = (progress.progress, total_lines) else {
            return;
        };
        if total == 0 {
            return;
        }
        let fraction = current as f64 / total as f64;
        if let Some(index) = self.renderer.cmd_index_for_progress(fraction) {
            self.renderer.render(index.layer, 0, index.cmd);
            self.layer = index.layer;
            self.cmd_first = 0;
            self.cmd_last = index.cmd;
            self.layer_info = self.renderer.layer_summary(index.layer);
        }
    }
}

impl PushConsumer for GcodeVm {
    fn apply_live_update(&mut self, payload: &StatusPayload, cx: &mut UpdateCx<'_>) {
        let job = &payload.job;
        let Some(filename) = &job.filename else {
            // Job deselected: drop the model so the viewer doesn't show a
            // file the printer no longer has loaded.
            if self.loaded_filename.is_some() {
                self.clear_model();
            }
            return;
        };

        if self.is_loaded(filename, job.date) {
            self.error_count = 0;
            let printing = cx.flags().is_printing() || cx.flags().is_paused();
            if printing && self.sync_progress {
                self.sync_to_progress(&payload.progress, job.lines);
            }
        } else if job.origin != Some(FileOrigin::Sdcard)
            && self.status == LoadStatus::Idle
            && !self.auto_load_suspended()
        {
            // Files on the printer's SD card can't be downloaded from the
            // host, so only local jobs auto-load.
            self.request_load(filename.clone(), job.date, cx);
        }
    }
}

impl Default for GcodeVm {
    /// A viewer backed by the built-in no-op engine.
    fn default() -> Self {
        Self::new(Box::new(crate::gcode_render::NoopRenderer::default()))
    }
}

impl std::fmt::Debug for GcodeVm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcodeVm")
            .field("loaded_filename", &self.loaded_filename)
            .field("loaded_file_date", &self.loaded_file_date)
            .field("status", &self.status)
            .field("error_count", &self.error_count)
            .field("sync_progress", &self.sync_progress)
            .field("layer", &self.layer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcode_render::{CmdIndex, MockGcodeRenderer};
    use crate::state::FlagsStore;
    use hostdeck_core::types::{JobInfo, PrinterState, StateFlags};

    fn flags_with(printing: bool) -> FlagsStore {
        let mut flags = FlagsStore::default();
        flags.apply(&PrinterState {
            flags: StateFlags {
                operational: true,
                printing,
                ..StateFlags::default()
            },
            ..PrinterState::default()
        });
        flags
    }

    fn summary(layers: usize, commands: usize, filament: Option<f64>) -> ModelSummary {
        ModelSummary {
            layer_count: layers,
            command_count: commands,
            filament_mm: filament,
        }
    }

    fn layer(height: Option<f64>, commands: usize) -> LayerSummary {
        LayerSummary {
            height_mm: height,
            command_count: commands,
        }
    }

    fn job_payload(filename: &str, date: Option<i64>) -> StatusPayload {
        StatusPayload {
            job: JobInfo {
                filename: Some(filename.to_string()),
                origin: Some(FileOrigin::Local),
                date,
                lines: Some(100),
                ..JobInfo::default()
            },
            ..StatusPayload::default()
        }
    }

    fn apply(vm: &mut GcodeVm, payload: &StatusPayload, flags: &FlagsStore) -> Vec<Task> {
        let mut cx = UpdateCx::new(flags);
        vm.apply_live_update(payload, &mut cx);
        cx.into_tasks()
    }

    #[test]
    fn test_unloaded_file_requests_download() {
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        let flags = flags_with(false);

        let tasks = apply(&mut vm, &job_payload("benchy.gcode", Some(7)), &flags);

        match tasks.as_slice() {
            [Task::FetchGcodeFile { token, filename, date }] => {
                assert_eq!(*token, 1);
                assert_eq!(filename, "benchy.gcode");
                assert_eq!(*date, Some(7));
            }
            other => panic!("expected fetch task, got {other:?}"),
        }
        assert_eq!(vm.status, LoadStatus::Request);

        // In-flight guard: the next frame must not start a second download.
        let tasks = apply(&mut vm, &job_payload("benchy.gcode", Some(7)), &flags);
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_sdcard_files_never_auto_load() {
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        let flags = flags_with(false);

        let mut payload = job_payload("benchy.gcode", None);
        payload.job.origin = Some(FileOrigin::Sdcard);

        assert!(apply(&mut vm, &payload, &flags).is_empty());
        assert_eq!(vm.status, LoadStatus::Idle);
    }

    #[test]
    fn test_complete_load_applies_model() {
        let mut renderer = MockGcodeRenderer::new();
        renderer
            .expect_load_file()
            .returning(|_| Ok(summary(10, 500, Some(900.0))));
        renderer
            .expect_layer_summary()
            .returning(|_| Some(layer(Some(0.2), 50)));

        let mut vm = GcodeVm::new(Box::new(renderer));
        let flags = flags_with(false);
        apply(&mut vm, &job_payload("benchy.gcode", Some(7)), &flags);

        vm.complete_load(1, "benchy.gcode".to_string(), Some(7), "G28\nG1 X1\n");

        assert_eq!(vm.status, LoadStatus::Idle);
        assert_eq!(vm.loaded_filename.as_deref(), Some("benchy.gcode"));
        assert_eq!(vm.loaded_file_date, Some(7));
        assert_eq!(vm.model.as_ref().unwrap().layer_count, 10);
        assert_eq!(vm.cmd_last, 49);
        assert_eq!(vm.error_count, 0);
    }

    #[test]
    fn test_stale_download_is_discarded() {
        // No expectations set: any renderer call would panic the test.
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        let flags = flags_with(false);
        apply(&mut vm, &job_payload("old.gcode", None), &flags);

        vm.fail_load(1);
        apply(&mut vm, &job_payload("new.gcode", None), &flags);

        // Token 1 belongs to the superseded old.gcode request.
        vm.complete_load(1, "old.gcode".to_string(), None, "G28\n");

        assert_eq!(vm.loaded_filename, None);
        assert_eq!(vm.status, LoadStatus::Request);
    }

    #[test]
    fn test_three_failures_suspend_auto_load() {
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        let flags = flags_with(false);

        for token in 1..=3 {
            let tasks = apply(&mut vm, &job_payload("benchy.gcode", None), &flags);
            assert_eq!(tasks.len(), 1, "attempt {token} should fetch");
            vm.fail_load(token);
        }
        assert_eq!(vm.error_count, 3);

        let tasks = apply(&mut vm, &job_payload("benchy.gcode", None), &flags);
        assert!(tasks.is_empty(), "suspended after three failures");

        vm.refresh();
        let tasks = apply(&mut vm, &job_payload("benchy.gcode", None), &flags);
        assert_eq!(tasks.len(), 1, "refresh re-arms auto-load");
    }

    #[test]
    fn test_matching_identity_resets_error_count() {
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        vm.loaded_filename = Some("benchy.gcode".to_string());
        vm.loaded_file_date = Some(7);
        vm.error_count = 2;

        let flags = flags_with(false);
        apply(&mut vm, &job_payload("benchy.gcode", Some(7)), &flags);

        assert_eq!(vm.error_count, 0);
    }

    #[test]
    fn test_progress_sync_drives_renderer() {
        let mut renderer = MockGcodeRenderer::new();
        renderer
            .expect_cmd_index_for_progress()
            .withf(|fraction| (fraction - 0.5).abs() < 1e-9)
            .return_const(Some(CmdIndex { layer: 2, cmd: 5 }));
        renderer
            .expect_render()
            .withf(|&layer, &first, &last| layer == 2 && first == 0 && last == 5)
            .return_const(());
        renderer
            .expect_layer_summary()
            .return_const(Some(layer(Some(0.4), 12)));

        let mut vm = GcodeVm::new(Box::new(renderer));
        vm.loaded_filename = Some("benchy.gcode".to_string());

        let mut payload = job_payload("benchy.gcode", None);
        payload.progress.progress = Some(50);

        let flags = flags_with(true);
        apply(&mut vm, &payload, &flags);

        assert_eq!(vm.layer, 2);
        assert_eq!(vm.cmd_last, 5);
        assert_eq!(vm.layer_info.as_ref().unwrap().command_count, 12);
    }

    #[test]
    fn test_progress_sync_respects_toggle() {
        // Renderer must stay untouched when sync is off.
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        vm.loaded_filename = Some("benchy.gcode".to_string());
        vm.sync_progress = false;

        let mut payload = job_payload("benchy.gcode", None);
        payload.progress.progress = Some(50);

        let flags = flags_with(true);
        apply(&mut vm, &payload, &flags);
    }

    #[test]
    fn test_idle_printer_does_not_sync() {
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        vm.loaded_filename = Some("benchy.gcode".to_string());

        let mut payload = job_payload("benchy.gcode", None);
        payload.progress.progress = Some(50);

        let flags = flags_with(false);
        apply(&mut vm, &payload, &flags);
    }

    #[test]
    fn test_job_deselection_clears_model() {
        let mut renderer = MockGcodeRenderer::new();
        renderer.expect_clear().times(1).return_const(());

        let mut vm = GcodeVm::new(Box::new(renderer));
        vm.loaded_filename = Some("benchy.gcode".to_string());
        vm.model = Some(ModelSummary::default());

        let flags = flags_with(false);
        apply(&mut vm, &StatusPayload::default(), &flags);

        assert_eq!(vm.loaded_filename, None);
        assert!(vm.model.is_none());

        // A second empty frame must not clear again (times(1) above).
        apply(&mut vm, &StatusPayload::default(), &flags);
    }

    #[test]
    fn test_move_layer_clamps_and_disables_sync() {
        let mut renderer = MockGcodeRenderer::new();
        renderer.expect_layer_summary().returning(|_| Some(layer(None, 20)));
        renderer.expect_render().return_const(());

        let mut vm = GcodeVm::new(Box::new(renderer));
        vm.model = Some(summary(3, 60, None));
        assert!(vm.sync_progress);

        vm.move_layer(10);
        assert_eq!(vm.layer, 2);
        assert!(!vm.sync_progress);

        vm.move_layer(-1);
        vm.move_layer(-5);
        assert_eq!(vm.layer, 0);
        assert_eq!(vm.cmd_last, 19);
    }

    #[test]
    fn test_move_layer_without_model_is_inert() {
        let mut vm = GcodeVm::new(Box::new(MockGcodeRenderer::new()));
        vm.move_layer(1);
        assert_eq!(vm.layer, 0);
        assert!(vm.sync_progress);
    }

    #[test]
    fn test_toggle_option_pushes_options_down() {
        let mut renderer = MockGcodeRenderer::new();
        renderer
            .expect_update_options()
            .withf(|options| !options.show_moves)
            .times(1)
            .return_const(());

        let mut vm = GcodeVm::new(Box::new(renderer));
        vm.toggle_option(ViewerToggle::ShowMoves);
        assert!(!vm.options.show_moves);
    }
}
