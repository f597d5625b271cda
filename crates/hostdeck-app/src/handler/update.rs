//! Main update function - processes messages and updates state

use hostdeck_core::prelude::*;

use crate::message::Message;
use crate::state::AppState;

use super::{keys, push, Task, UpdateAction, UpdateResult};

/// Process one message against the application state.
///
/// Pure state transition: all IO happens in the spawned tasks the returned
/// [`UpdateResult`] asks for.
pub fn update(state: &mut AppState, msg: Message) -> UpdateResult {
    match msg {
        Message::Key(key) => match keys::handle_key(state, key) {
            Some(follow_up) => UpdateResult::message(follow_up),
            None => UpdateResult::none(),
        },

        Message::Push(event) => push::handle_push_event(state, event),

        Message::Tick => UpdateResult::none(),

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::NextTab => {
            state.next_tab();
            UpdateResult::none()
        }

        Message::PrevTab => {
            state.prev_tab();
            UpdateResult::none()
        }

        Message::ReconnectChannel => {
            info!("manual push channel reconnect requested");
            UpdateResult::action(UpdateAction::ReconnectChannel)
        }

        // ─────────────────────────────────────────────────────────
        // Connection
        // ─────────────────────────────────────────────────────────
        Message::ToggleConnectionPanel => {
            state.connection.toggle_panel();
            UpdateResult::none()
        }

        Message::CyclePort => {
            state.connection.cycle_port();
            UpdateResult::none()
        }

        Message::CycleBaud => {
            state.connection.cycle_baudrate();
            UpdateResult::none()
        }

        Message::ToggleSaveSettings => {
            state.connection.toggle_save_settings();
            UpdateResult::none()
        }

        Message::ToggleConnection => {
            let task = state
                .connection
                .toggle_connection_task(state.flags.is_closed_or_error());
            debug!(?task, "connection toggle");
            spawn(task)
        }

        Message::ConnectionOptionsLoaded { options } => {
            state.connection.apply_options(options);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Job
        // ─────────────────────────────────────────────────────────
        Message::StartPrint => spawn(Task::StartPrint),
        Message::PausePrint => spawn(Task::PausePrint),
        Message::CancelPrint => spawn(Task::CancelPrint),

        // ─────────────────────────────────────────────────────────
        // Temperature
        // ─────────────────────────────────────────────────────────
        Message::TempFocusNext => {
            state.temperature.focus_next();
            UpdateResult::none()
        }

        Message::TempAdjust { delta } => {
            state.temperature.adjust_focused(delta);
            UpdateResult::none()
        }

        Message::TempSend => spawn(state.temperature.send_task()),

        // ─────────────────────────────────────────────────────────
        // Controls
        // ─────────────────────────────────────────────────────────
        Message::ControlUp => {
            state.controls.cursor_up();
            UpdateResult::none()
        }

        Message::ControlDown => {
            state.controls.cursor_down();
            UpdateResult::none()
        }

        Message::ControlActivate => match state.controls.activate() {
            Some(task) => spawn(task),
            None => UpdateResult::none(),
        },

        Message::ControlEditToggle => {
            state.controls.toggle_edit();
            UpdateResult::none()
        }

        Message::ControlInputNext => {
            state.controls.focus_next_input();
            UpdateResult::none()
        }

        Message::ControlInputPrev => {
            state.controls.focus_prev_input();
            UpdateResult::none()
        }

        Message::ControlInputChar(c) => {
            state.controls.input_push_char(c);
            UpdateResult::none()
        }

        Message::ControlInputBackspace => {
            state.controls.input_backspace();
            UpdateResult::none()
        }

        Message::CycleJogDistance => {
            state.controls.cycle_jog_distance();
            UpdateResult::none()
        }

        Message::Jog { axis, distance } => spawn(Task::Jog { axis, distance }),

        Message::Home { axis } => spawn(Task::Home { axis }),

        Message::ControlsLoaded { controls } => {
            debug!(count = controls.len(), "custom controls loaded");
            state.controls.set_controls(controls);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Speed
        // ─────────────────────────────────────────────────────────
        Message::CycleSpeedField => {
            state.speed.cycle_field();
            UpdateResult::none()
        }

        Message::SpeedAdjust { delta } => {
            state.speed.adjust_input(delta);
            UpdateResult::none()
        }

        Message::SpeedSend => spawn(state.speed.send_task()),

        Message::SpeedLoaded { feedrates } => {
            state.speed.apply_response(feedrates);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Terminal
        // ─────────────────────────────────────────────────────────
        Message::TerminalInputChar(c) => {
            state.terminal.input_push_char(c);
            UpdateResult::none()
        }

        Message::TerminalInputBackspace => {
            state.terminal.input_backspace();
            UpdateResult::none()
        }

        Message::TerminalInputClear => {
            state.terminal.input_clear();
            UpdateResult::none()
        }

        Message::TerminalSend => match state.terminal.take_input() {
            Some(command) => spawn(Task::SendCommand { command }),
            None => UpdateResult::none(),
        },

        Message::ToggleAutoScroll => {
            state.terminal.toggle_auto_scroll();
            UpdateResult::none()
        }

        Message::TerminalScroll { delta } => {
            state.terminal.scroll(delta);
            UpdateResult::none()
        }

        Message::TerminalScrollTop => {
            state.terminal.scroll_to_top();
            UpdateResult::none()
        }

        Message::TerminalScrollBottom => {
            state.terminal.scroll_to_bottom();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Files
        // ─────────────────────────────────────────────────────────
        Message::FilesUp => {
            state.files.select_up();
            UpdateResult::none()
        }

        Message::FilesDown => {
            state.files.select_down();
            UpdateResult::none()
        }

        Message::FilesPrevPage => {
            state.files.prev_page();
            UpdateResult::none()
        }

        Message::FilesNextPage => {
            state.files.next_page();
            UpdateResult::none()
        }

        Message::FilesGotoPage(page) => {
            state.files.change_page(page);
            UpdateResult::none()
        }

        Message::FileLoad => match state.files.selected_file() {
            Some(file) => spawn(Task::LoadFile {
                filename: file.name.clone(),
            }),
            None => UpdateResult::none(),
        },

        Message::FileDelete => match state.files.selected_file() {
            Some(file) => spawn(Task::DeleteFile {
                filename: file.name.clone(),
            }),
            None => UpdateResult::none(),
        },

        Message::FilesRefresh => spawn(Task::FetchFiles),

        Message::FilesLoaded { listing } => {
            debug!(count = listing.files.len(), "file listing loaded");
            state.files.set_files(listing.files);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Webcam / Timelapse
        // ─────────────────────────────────────────────────────────
        Message::TimelapseUp => {
            state.webcam.select_up();
            UpdateResult::none()
        }

        Message::TimelapseDown => {
            state.webcam.select_down();
            UpdateResult::none()
        }

        Message::CycleTimelapseMode => {
            state.webcam.cycle_mode();
            UpdateResult::none()
        }

        Message::AdjustTimelapseInterval { delta } => {
            state.webcam.adjust_interval(delta);
            UpdateResult::none()
        }

        Message::SaveTimelapseConfig => spawn(state.webcam.save_task()),

        Message::TimelapseDelete => match state.webcam.delete_task() {
            Some(task) => spawn(task),
            None => UpdateResult::none(),
        },

        Message::TimelapseRefresh => spawn(Task::FetchTimelapse),

        Message::TimelapseLoaded { response } => {
            state.webcam.apply_response(response);
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // G-code Viewer
        // ─────────────────────────────────────────────────────────
        Message::GcodeToggleOption(which) => {
            state.gcode.toggle_option(which);
            UpdateResult::none()
        }

        Message::GcodeToggleSync => {
            state.gcode.toggle_sync();
            UpdateResult::none()
        }

        Message::GcodeLayerNext => {
            state.gcode.move_layer(1);
            UpdateResult::none()
        }

        Message::GcodeLayerPrev => {
            state.gcode.move_layer(-1);
            UpdateResult::none()
        }

        Message::GcodeRefresh => {
            state.gcode.refresh();
            UpdateResult::none()
        }

        Message::GcodeFileLoaded { token, filename, date, content } => {
            state.gcode.complete_load(token, filename, date, &content);
            UpdateResult::none()
        }

        Message::GcodeFileFailed { token } => {
            state.gcode.fail_load(token);
            UpdateResult::none()
        }
    }
}

fn spawn(task: Task) -> UpdateResult {
    UpdateResult::action(UpdateAction::SpawnTask(task))
}
