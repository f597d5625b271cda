//! Webcam and timelapse panel state.

use hostdeck_core::push::StatusPayload;
use hostdeck_core::types::{TimelapseFile, TimelapseMode};

use hostdeck_client::api::TimelapseResponse;

use crate::handler::Task;

use super::{PushConsumer, UpdateCx};

/// Interval seeded when the user first nudges an unset timed interval.
const DEFAULT_INTERVAL_SECS: u32 = 10;

/// View-model for the webcam stream and timelapse configuration.
///
/// The rendered clip list and capture config come from the timelapse
/// endpoint; the stream URL comes from local settings. The interval is kept
/// whatever the capture mode, it just isn't sent unless the mode is timed.
#[derive(Debug, Default)]
pub struct WebcamVm {
    pub mode: TimelapseMode,
    /// Capture interval in seconds for timed mode.
    pub interval: Option<u32>,
    pub files: Vec<TimelapseFile>,
    /// Selected row of the clip list.
    pub selected: usize,
    /// MJPEG stream URL from settings, if configured.
    pub stream_base: Option<String>,
}

impl WebcamVm {
    pub fn new(stream_base: Option<String>) -> Self {
        Self {
            stream_base,
            ..Self::default()
        }
    }

    /// Apply a timelapse response: mode, clip list and stored interval.
    pub fn apply_response(&mut self, response: TimelapseResponse) {
        self.mode = response.mode;
        self.interval = response.config.interval;
        self.files = response.files;
        let last = self.files.len().saturating_sub(1);
        self.selected = self.selected.min(last);
    }

    pub fn selected_file(&self) -> Option<&TimelapseFile> {
        self.files.get(self.selected)
    }

    pub fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let last = self.files.len().saturating_sub(1);
        if self.selected < last {
            self.selected += 1;
        }
    }

    pub fn cycle_mode(&mut self) {
        self.mode = match self.mode {
            TimelapseMode::Off => TimelapseMode::Timed,
            TimelapseMode::Timed => TimelapseMode::Zchange,
            TimelapseMode::Zchange => TimelapseMode::Off,
        };
    }

    /// Nudge the timed interval, seeding it on first touch. Never below
    /// one second.
    pub fn adjust_interval(&mut self, delta: i32) {
        let current = self.interval.unwrap_or(DEFAULT_INTERVAL_SECS);
        self.interval = Some(current.saturating_add_signed(delta).max(1));
    }

    /// Config save request. The interval only travels in timed mode.
    pub fn save_task(&self) -> Task {
        let interval = match self.mode {
            TimelapseMode::Timed => self.interval,
            _ => None,
        };
        let mode = self.mode;
        Task::SaveTimelapseConfig { mode, interval }
    }

    /// Delete request for the selected clip, if any.
    pub fn delete_task(&self) -> Option<Task> {
        let filename = self.selected_file()?.name.clone();
        Some(Task::DeleteTimelapse { filename })
    }

    /// Stream URL with a cache-busting timestamp, the way browsers force
    /// MJPEG sources to reconnect.
    pub fn stream_url(&self, now_ms: i64) -> Option<String> {
        self.stream_base.as_ref().map(|base| format!("{base}?{now_ms}"))
    }
}

impl PushConsumer for WebcamVm {
    fn apply_live_update(&mut self, _payload: &StatusPayload, cx: &mut UpdateCx<'_>) {
        // Rendered clips appear when a print starts or finishes, so refetch
        // the list whenever the printer link comes or goes.
        if cx.flags().operational_changed().is_some() {
            cx.enqueue(Task::FetchTimelapse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FlagsStore;
    use hostdeck_client::api::TimelapseSettings;
    use hostdeck_core::types::{PrinterState, StateFlags};

    fn clip(name: &str) -> TimelapseFile {
        TimelapseFile {
            name: name.to_string(),
            size: None,
            date: None,
        }
    }

    fn response(mode: TimelapseMode, interval: Option<u32>, names: &[&str]) -> TimelapseResponse {
        TimelapseResponse {
            mode,
            files: names.iter().map(|n| clip(n)).collect(),
            config: TimelapseSettings { interval },
        }
    }

    #[test]
    fn test_apply_response_keeps_interval_in_any_mode() {
        let mut vm = WebcamVm::new(None);
        vm.apply_response(response(TimelapseMode::Off, Some(15), &[]));

        assert_eq!(vm.mode, TimelapseMode::Off);
        assert_eq!(vm.interval, Some(15));
    }

    #[test]
    fn test_apply_response_clamps_selection() {
        let mut vm = WebcamVm::new(None);
        vm.apply_response(response(TimelapseMode::Off, None, &["a.mpg", "b.mpg", "c.mpg"]));
        vm.select_down();
        vm.select_down();

        vm.apply_response(response(TimelapseMode::Off, None, &["a.mpg"]));
        assert_eq!(vm.selected, 0);
    }

    #[test]
    fn test_cycle_mode_wraps() {
        let mut vm = WebcamVm::new(None);
        assert_eq!(vm.mode, TimelapseMode::Off);

        vm.cycle_mode();
        assert_eq!(vm.mode, TimelapseMode::Timed);
        vm.cycle_mode();
        assert_eq!(vm.mode, TimelapseMode::Zchange);
        vm.cycle_mode();
        assert_eq!(vm.mode, TimelapseMode::Off);
    }

    #[test]
    fn test_adjust_interval_seeds_and_clamps() {
        let mut vm = WebcamVm::new(None);
        vm.adjust_interval(5);
        assert_eq!(vm.interval, Some(15));

        vm.adjust_interval(-100);
        assert_eq!(vm.interval, Some(1));
    }

    #[test]
    fn test_save_task_sends_interval_only_when_timed() {
        let mut vm = WebcamVm::new(None);
        vm.interval = Some(20);

        match vm.save_task() {
            Task::SaveTimelapseConfig { mode, interval } => {
                assert_eq!(mode, TimelapseMode::Off);
                assert_eq!(interval, None);
            }
            other => panic!("expected config task, got {other:?}"),
        }

        vm.cycle_mode();
        match vm.save_task() {
            Task::SaveTimelapseConfig { mode, interval } => {
                assert_eq!(mode, TimelapseMode::Timed);
                assert_eq!(interval, Some(20));
            }
            other => panic!("expected config task, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_task_targets_selection() {
        let mut vm = WebcamVm::new(None);
        assert!(vm.delete_task().is_none());

        vm.apply_response(response(TimelapseMode::Off, None, &["a.mpg", "b.mpg"]));
        vm.select_down();

        match vm.delete_task() {
            Some(Task::DeleteTimelapse { filename }) => assert_eq!(filename, "b.mpg"),
            other => panic!("expected delete task, got {other:?}"),
        }
    }

    #[test]
    fn test_stream_url_appends_cache_buster() {
        let vm = WebcamVm::new(Some("http://cam.local/stream".into()));
        assert_eq!(
            vm.stream_url(1_700_000_000_000).as_deref(),
            Some("http://cam.local/stream?1700000000000")
        );

        let vm = WebcamVm::new(None);
        assert!(vm.stream_url(0).is_none());
    }

    #[test]
    fn test_operational_transition_refreshes_clip_list() {
        let mut vm = WebcamVm::new(None);
        let mut flags = FlagsStore::default();
        flags.apply(&PrinterState {
            flags: StateFlags {
                operational: true,
                ..StateFlags::default()
            },
            ..PrinterState::default()
        });

        let mut cx = UpdateCx::new(&flags);
        vm.apply_live_update(&StatusPayload::default(), &mut cx);
        let tasks = cx.into_tasks();
        assert!(matches!(tasks.as_slice(), [Task::FetchTimelapse]));

        // Steady state requests nothing.
        flags.apply(&PrinterState {
            flags: StateFlags {
                operational: true,
                ..StateFlags::default()
            },
            ..PrinterState::default()
        });
        let mut cx = UpdateCx::new(&flags);
        vm.apply_live_update(&StatusPayload::default(), &mut cx);
        assert!(cx.into_tasks().is_empty());
    }
}
