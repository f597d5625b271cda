//! Key event handlers per panel tab.
//!
//! Translation only: a key becomes a [`Message`] (or nothing), all state
//! changes happen in `update`. The offline overlay and the controls editing
//! mode capture keys before the per-tab maps run.

use hostdeck_client::api::JogAxis;

use crate::gcode_render::ViewerToggle;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, UiTab};

pub(crate) fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Ctrl+C quits from anywhere, overlay or not.
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    if state.offline.is_some() {
        return handle_offline_key(key);
    }

    match key {
        InputKey::Tab => return Some(Message::NextTab),
        InputKey::BackTab => return Some(Message::PrevTab),
        _ => {}
    }

    match state.active_tab {
        UiTab::Connection => handle_connection_key(key),
        UiTab::Temperature => handle_temperature_key(key),
        UiTab::Controls => handle_controls_key(state, key),
        UiTab::Terminal => handle_terminal_key(key),
        UiTab::Files => handle_files_key(key),
        UiTab::Webcam => handle_webcam_key(key),
        UiTab::Gcode => handle_gcode_key(key),
    }
}

/// While the offline overlay is up only reconnect and quit work.
fn handle_offline_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('r') | InputKey::Char('R') => Some(Message::ReconnectChannel),
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_connection_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::ToggleConnection),
        InputKey::Char('p') => Some(Message::CyclePort),
        InputKey::Char('b') => Some(Message::CycleBaud),
        InputKey::Char('s') => Some(Message::ToggleSaveSettings),
        InputKey::Char('o') => Some(Message::ToggleConnectionPanel),
        InputKey::Char('P') => Some(Message::StartPrint),
        InputKey::Char(' ') => Some(Message::PausePrint),
        InputKey::Char('X') => Some(Message::CancelPrint),
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_temperature_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Left | InputKey::Right => Some(Message::TempFocusNext),
        InputKey::Up => Some(Message::TempAdjust { delta: 5 }),
        InputKey::Down => Some(Message::TempAdjust { delta: -5 }),
        InputKey::Enter => Some(Message::TempSend),
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_controls_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Input editing captures the keyboard until Esc/Enter.
    if state.controls.editing {
        return match key {
            InputKey::Esc | InputKey::Enter => Some(Message::ControlEditToggle),
            InputKey::Char('[') => Some(Message::ControlInputPrev),
            InputKey::Char(']') => Some(Message::ControlInputNext),
            InputKey::Backspace => Some(Message::ControlInputBackspace),
            InputKey::Char(c) => Some(Message::ControlInputChar(c)),
            _ => None,
        };
    }

    let distance = state.controls.jog_distance();
    match key {
        InputKey::Char('k') => Some(Message::ControlUp),
        InputKey::Char('j') => Some(Message::ControlDown),
        InputKey::Enter => Some(Message::ControlActivate),
        InputKey::Char('i') => Some(Message::ControlEditToggle),

        InputKey::Up => jog(JogAxis::Y, distance),
        InputKey::Down => jog(JogAxis::Y, -distance),
        InputKey::Left => jog(JogAxis::X, -distance),
        InputKey::Right => jog(JogAxis::X, distance),
        InputKey::PageUp => jog(JogAxis::Z, distance),
        InputKey::PageDown => jog(JogAxis::Z, -distance),
        InputKey::Char('x') => Some(Message::Home { axis: JogAxis::X }),
        InputKey::Char('y') => Some(Message::Home { axis: JogAxis::Y }),
        InputKey::Char('z') => Some(Message::Home { axis: JogAxis::Z }),
        InputKey::Char('g') => Some(Message::CycleJogDistance),

        InputKey::Char('f') => Some(Message::CycleSpeedField),
        InputKey::Char('-') => Some(Message::SpeedAdjust { delta: -10 }),
        InputKey::Char('=') => Some(Message::SpeedAdjust { delta: 10 }),
        InputKey::Char('F') => Some(Message::SpeedSend),

        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn jog(axis: JogAxis, distance: f64) -> Option<Message> {
    Some(Message::Jog { axis, distance })
}

/// The terminal types; almost everything feeds the command field.
fn handle_terminal_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Enter => Some(Message::TerminalSend),
        InputKey::Backspace => Some(Message::TerminalInputBackspace),
        InputKey::CharCtrl('u') => Some(Message::TerminalInputClear),
        InputKey::CharCtrl('s') => Some(Message::ToggleAutoScroll),
        InputKey::Up => Some(Message::TerminalScroll { delta: -1 }),
        InputKey::Down => Some(Message::TerminalScroll { delta: 1 }),
        InputKey::PageUp => Some(Message::TerminalScroll { delta: -10 }),
        InputKey::PageDown => Some(Message::TerminalScroll { delta: 10 }),
        InputKey::Home => Some(Message::TerminalScrollTop),
        InputKey::End => Some(Message::TerminalScrollBottom),
        InputKey::Char(c) => Some(Message::TerminalInputChar(c)),
        _ => None,
    }
}

fn handle_files_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up => Some(Message::FilesUp),
        InputKey::Down => Some(Message::FilesDown),
        InputKey::Left => Some(Message::FilesPrevPage),
        InputKey::Right => Some(Message::FilesNextPage),
        InputKey::Enter => Some(Message::FileLoad),
        InputKey::Char('d') => Some(Message::FileDelete),
        InputKey::Char('r') => Some(Message::FilesRefresh),
        InputKey::Char(c @ '1'..='9') => {
            let page = (c as usize) - ('1' as usize);
            Some(Message::FilesGotoPage(page))
        }
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_webcam_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up => Some(Message::TimelapseUp),
        InputKey::Down => Some(Message::TimelapseDown),
        InputKey::Char('m') => Some(Message::CycleTimelapseMode),
        InputKey::Char('+') => Some(Message::AdjustTimelapseInterval { delta: 1 }),
        InputKey::Char('-') => Some(Message::AdjustTimelapseInterval { delta: -1 }),
        InputKey::Enter => Some(Message::SaveTimelapseConfig),
        InputKey::Char('d') => Some(Message::TimelapseDelete),
        InputKey::Char('r') => Some(Message::TimelapseRefresh),
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_gcode_key(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up => Some(Message::GcodeLayerNext),
        InputKey::Down => Some(Message::GcodeLayerPrev),
        InputKey::Char('s') => Some(Message::GcodeToggleSync),
        InputKey::Char('R') => Some(Message::GcodeRefresh),

        InputKey::Char('m') => Some(Message::GcodeToggleOption(ViewerToggle::ShowMoves)),
        InputKey::Char('e') => Some(Message::GcodeToggleOption(ViewerToggle::ShowRetracts)),
        InputKey::Char('c') => Some(Message::GcodeToggleOption(ViewerToggle::CenterViewport)),
        InputKey::Char('v') => Some(Message::GcodeToggleOption(ViewerToggle::MoveModel)),
        InputKey::Char('z') => Some(Message::GcodeToggleOption(ViewerToggle::ZoomOnModel)),
        InputKey::Char('n') => Some(Message::GcodeToggleOption(ViewerToggle::ShowNextLayer)),
        InputKey::Char('b') => Some(Message::GcodeToggleOption(ViewerToggle::ShowPreviousLayer)),
        InputKey::Char('o') => Some(Message::GcodeToggleOption(ViewerToggle::SortLayers)),
        InputKey::Char('u') => Some(Message::GcodeToggleOption(ViewerToggle::PurgeEmptyLayers)),

        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}
