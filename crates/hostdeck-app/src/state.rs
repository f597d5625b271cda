//! Application state.
//!
//! [`AppState`] is the single mutable state of the program: the shared
//! printer flags, the offline indicator, and one view-model per panel. The
//! update handler is the only code that mutates it.

use hostdeck_core::types::{PrinterState, StateFlags};

use crate::config::Settings;
use crate::handler::Task;
use crate::viewmodel::{
    ConnectionVm, ControlsVm, FilesVm, GcodeVm, PrinterVm, SpeedVm, TemperatureVm, TerminalVm,
    WebcamVm,
};

/// The selectable panels, in tab order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UiTab {
    #[default]
    Connection,
    Temperature,
    Controls,
    Terminal,
    Files,
    Webcam,
    Gcode,
}

impl UiTab {
    pub fn all() -> [UiTab; 7] {
        [
            UiTab::Connection,
            UiTab::Temperature,
            UiTab::Controls,
            UiTab::Terminal,
            UiTab::Files,
            UiTab::Webcam,
            UiTab::Gcode,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            UiTab::Connection => "Connection",
            UiTab::Temperature => "Temperature",
            UiTab::Controls => "Controls",
            UiTab::Terminal => "Terminal",
            UiTab::Files => "Files",
            UiTab::Webcam => "Webcam",
            UiTab::Gcode => "G-code",
        }
    }

    pub fn next(self) -> Self {
        let tabs = Self::all();
        let index = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(index + 1) % tabs.len()]
    }

    pub fn prev(self) -> Self {
        let tabs = Self::all();
        let index = tabs.iter().position(|t| *t == self).unwrap_or(0);
        tabs[(index + tabs.len() - 1) % tabs.len()]
    }
}

/// Why the offline overlay is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfflineNotice {
    /// The push channel dropped; automatic reconnection is running.
    Reconnecting,
    /// Automatic reconnection gave up after exhausting its retries.
    GaveUp,
}

impl OfflineNotice {
    pub fn message(&self) -> &'static str {
        match self {
            OfflineNotice::Reconnecting => {
                "Server connection lost. Reconnecting automatically; press r to retry now."
            }
            OfflineNotice::GaveUp => {
                "Automatic reconnection failed. Press r to reconnect manually."
            }
        }
    }
}

/// Shared printer state flags, with one frame of history.
///
/// Applied exactly once per status frame, before the frame fans out to the
/// view-models, so every consumer sees the same transition.
#[derive(Debug, Clone, Default)]
pub struct FlagsStore {
    current: StateFlags,
    previous: StateFlags,
    state_string: Option<String>,
}

impl FlagsStore {
    /// Overwrite the flags from a status frame, keeping the outgoing set
    /// for transition detection.
    pub fn apply(&mut self, state: &PrinterState) {
        self.previous = self.current;
        self.current = state.flags;
        self.state_string = state.state_string.clone();
    }

    pub fn is_operational(&self) -> bool {
        self.current.operational
    }

    pub fn is_printing(&self) -> bool {
        self.current.printing
    }

    pub fn is_paused(&self) -> bool {
        self.current.paused
    }

    pub fn is_closed_or_error(&self) -> bool {
        self.current.closed_or_error
    }

    pub fn has_error(&self) -> bool {
        self.current.error
    }

    pub fn is_ready(&self) -> bool {
        self.current.ready
    }

    pub fn is_loading(&self) -> bool {
        self.current.loading
    }

    /// Host's human-readable state line, e.g. "Operational".
    pub fn state_string(&self) -> &str {
        self.state_string.as_deref().unwrap_or("Offline")
    }

    /// `Some(new_value)` when the last applied frame flipped the
    /// operational flag, `None` in steady state.
    pub fn operational_changed(&self) -> Option<bool> {
        if self.previous.operational != self.current.operational {
            Some(self.current.operational)
        } else {
            None
        }
    }
}

/// Full application state: one view-model per panel plus the shared bits.
#[derive(Debug)]
pub struct AppState {
    pub active_tab: UiTab,
    quitting: bool,
    pub settings: Settings,
    pub flags: FlagsStore,
    /// Offline overlay, up whenever the push channel is down.
    pub offline: Option<OfflineNotice>,
    pub connection: ConnectionVm,
    pub printer: PrinterVm,
    pub temperature: TemperatureVm,
    pub controls: ControlsVm,
    pub speed: SpeedVm,
    pub terminal: TerminalVm,
    pub files: FilesVm,
    pub webcam: WebcamVm,
    pub gcode: GcodeVm,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let files = FilesVm::new(settings.ui.files_per_page);
        let webcam = WebcamVm::new(settings.webcam.stream_url.clone());
        Self {
            active_tab: UiTab::default(),
            quitting: false,
            settings,
            flags: FlagsStore::default(),
            offline: None,
            connection: ConnectionVm::new(),
            printer: PrinterVm::new(),
            temperature: TemperatureVm::new(),
            controls: ControlsVm::new(),
            speed: SpeedVm::new(),
            terminal: TerminalVm::new(),
            files,
            webcam,
            gcode: GcodeVm::default(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn next_tab(&mut self) {
        self.active_tab = self.active_tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.active_tab = self.active_tab.prev();
    }

    /// One-shot fetches issued at startup to populate every panel.
    pub fn startup_tasks(&self) -> Vec<Task> {
        vec![
            Task::FetchConnectionOptions,
            Task::FetchControls,
            Task::FetchSpeed,
            Task::FetchFiles,
            Task::FetchTimelapse,
        ]
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(operational: bool) -> PrinterState {
        let label = if operational {
            "Operational"
        } else {
            "Offline"
        };
        PrinterState {
            state_string: Some(label.to_string()),
            flags: StateFlags {
                operational,
                ..StateFlags::default()
            },
        }
    }

    #[test]
    fn test_flags_track_transitions() {
        let mut flags = FlagsStore::default();
        assert_eq!(flags.operational_changed(), None);

        flags.apply(&state_with(true));
        assert_eq!(flags.operational_changed(), Some(true));
        assert!(flags.is_operational());

        flags.apply(&state_with(true));
        assert_eq!(flags.operational_changed(), None);

        flags.apply(&state_with(false));
        assert_eq!(flags.operational_changed(), Some(false));
    }

    #[test]
    fn test_state_string_defaults_to_offline() {
        let flags = FlagsStore::default();
        assert_eq!(flags.state_string(), "Offline");

        let mut flags = FlagsStore::default();
        flags.apply(&state_with(true));
        assert_eq!(flags.state_string(), "Operational");
    }

    #[test]
    fn test_tab_cycling_wraps() {
        let mut state = AppState::new();
        assert_eq!(state.active_tab, UiTab::Connection);

        state.prev_tab();
        assert_eq!(state.active_tab, UiTab::Gcode);
        state.next_tab();
        assert_eq!(state.active_tab, UiTab::Connection);

        for _ in 0..UiTab::all().len() {
            state.next_tab();
        }
        assert_eq!(state.active_tab, UiTab::Connection);
    }

    #[test]
    fn test_startup_tasks_populate_every_panel() {
        let state = AppState::new();
        let tasks = state.startup_tasks();

        assert_eq!(tasks.len(), 5);
        assert!(matches!(tasks[0], Task::FetchConnectionOptions));
        assert!(tasks.iter().any(|t| matches!(t, Task::FetchFiles)));
        assert!(tasks.iter().any(|t| matches!(t, Task::FetchTimelapse)));
    }

    #[test]
    fn test_quit_flag() {
        let mut state = AppState::new();
        assert!(!state.should_quit());
        state.request_quit();
        assert!(state.should_quit());
    }
}
