//! Terminal panel state: communication log and command entry.

use hostdeck_core::push::StatusPayload;

use super::{PushConsumer, UpdateCx};

/// View-model for the terminal panel.
///
/// The log mirrors the host's serial communication buffer: live frames
/// append their new lines, a history replay replaces the whole thing. The
/// host owns retention, so nothing is trimmed here.
#[derive(Debug)]
pub struct TerminalVm {
    pub log: Vec<String>,
    /// Follow the newest line. Manual scrolling turns this off.
    pub auto_scroll: bool,
    /// First visible line when not following.
    pub scroll_offset: usize,
    /// Command entry field.
    pub input: String,
}

impl Default for TerminalVm {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            auto_scroll: true,
            scroll_offset: 0,
            input: String::new(),
        }
    }
}

impl TerminalVm {
    pub fn new() -> Self {
        Self::default()
    }

    /// First line to draw for a viewport of `visible` rows.
    pub fn scroll_target(&self, visible: usize) -> usize {
        let max_offset = self.log.len().saturating_sub(visible);
        if self.auto_scroll {
            max_offset
        } else {
            self.scroll_offset.min(max_offset)
        }
    }

    /// Move the viewport by `delta` lines and stop following the tail.
    pub fn scroll(&mut self, delta: i32) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta as isize);
        // Keep the stored offset inside the log so a later small viewport
        // doesn't start past the end.
        self.scroll_offset = self.scroll_offset.min(self.log.len());
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }

    /// Jump back to the tail and resume following it.
    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
    }

    pub fn input_push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
    }

    pub fn input_clear(&mut self) {
        self.input.clear();
    }

    /// Take the entered command, leaving the field empty. An empty field
    /// yields nothing, so Enter on a blank line is a no-op.
    pub fn take_input(&mut self) -> Option<String> {
        if self.input.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.input))
        }
    }
}

impl PushConsumer for TerminalVm {
    fn apply_live_update(&mut self, payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {
        self.log.extend(payload.logs.iter().cloned());
    }

    fn apply_snapshot_replay(&mut self, payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {
        if let Some(history) = &payload.log_history {
            self.log = history.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FlagsStore;

    fn live(vm: &mut TerminalVm, lines: &[&str]) {
        let flags = FlagsStore::default();
        let mut cx = UpdateCx::new(&flags);
        vm.apply_live_update(
            &StatusPayload {
                logs: lines.iter().map(|l| l.to_string()).collect(),
                ..StatusPayload::default()
            },
            &mut cx,
        );
    }

    #[test]
    fn test_live_frames_append_in_order() {
        let mut vm = TerminalVm::new();
        live(&mut vm, &["Send: M105", "Recv: ok T:21.3"]);
        live(&mut vm, &["Send: G28"]);

        assert_eq!(vm.log, vec!["Send: M105", "Recv: ok T:21.3", "Send: G28"]);
    }

    #[test]
    fn test_history_replaces_log() {
        let mut vm = TerminalVm::new();
        live(&mut vm, &["old line"]);

        let flags = FlagsStore::default();
        let mut cx = UpdateCx::new(&flags);
        vm.apply_snapshot_replay(
            &StatusPayload {
                log_history: Some(vec!["replayed".to_string()]),
                ..StatusPayload::default()
            },
            &mut cx,
        );

        assert_eq!(vm.log, vec!["replayed"]);
    }

    #[test]
    fn test_history_without_log_keeps_existing() {
        let mut vm = TerminalVm::new();
        live(&mut vm, &["kept"]);

        let flags = FlagsStore::default();
        let mut cx = UpdateCx::new(&flags);
        vm.apply_snapshot_replay(&StatusPayload::default(), &mut cx);

        assert_eq!(vm.log, vec!["kept"]);
    }

    #[test]
    fn test_scroll_target_follows_tail() {
        let mut vm = TerminalVm::new();
        live(&mut vm, &["a", "b", "c", "d", "e"]);

        assert_eq!(vm.scroll_target(3), 2);
        assert_eq!(vm.scroll_target(10), 0);
    }

    #[test]
    fn test_manual_scroll_stops_following() {
        let mut vm = TerminalVm::new();
        live(&mut vm, &["a", "b", "c", "d", "e"]);

        vm.scroll(-10);
        assert!(!vm.auto_scroll);
        assert_eq!(vm.scroll_target(3), 0);

        live(&mut vm, &["f"]);
        assert_eq!(vm.scroll_target(3), 0);

        vm.scroll_to_bottom();
        assert_eq!(vm.scroll_target(3), 3);
    }

    #[test]
    fn test_scroll_offset_clamped_to_log() {
        let mut vm = TerminalVm::new();
        live(&mut vm, &["a", "b", "c"]);

        vm.scroll(100);
        assert_eq!(vm.scroll_target(2), 1);
    }

    #[test]
    fn test_take_input() {
        let mut vm = TerminalVm::new();
        assert_eq!(vm.take_input(), None);

        vm.input_push_char('G');
        vm.input_push_char('2');
        vm.input_push_char('8');
        assert_eq!(vm.take_input(), Some("G28".to_string()));
        assert!(vm.input.is_empty());
    }

    #[test]
    fn test_input_editing() {
        let mut vm = TerminalVm::new();
        vm.input_push_char('M');
        vm.input_push_char('1');
        vm.input_backspace();
        assert_eq!(vm.input, "M");

        vm.input_clear();
        assert!(vm.input.is_empty());
    }
}
