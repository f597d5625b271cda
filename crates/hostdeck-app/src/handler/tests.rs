//! Handler tests - update() dispatch, key routing, frame fan-out

use hostdeck_core::push::{PushEvent, PushFrame, StatusPayload};
use hostdeck_core::types::{
    ControlDefinition, ControlInput, FileOrigin, JobInfo, PrinterState, StateFlags,
    TemperatureSeries,
};

use crate::handler::{handle_key, update, Task, UpdateAction};
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::{AppState, OfflineNotice, UiTab};

fn current_frame(payload: StatusPayload) -> Message {
    Message::Push(PushEvent::Frame(PushFrame::Current(payload)))
}

fn history_frame(payload: StatusPayload) -> Message {
    Message::Push(PushEvent::Frame(PushFrame::History(payload)))
}

fn payload_with_flags(flags: StateFlags) -> StatusPayload {
    StatusPayload {
        state: PrinterState {
            state_string: Some("Operational".into()),
            flags,
        },
        ..StatusPayload::default()
    }
}

fn operational_flags() -> StateFlags {
    StateFlags {
        operational: true,
        ready: true,
        ..StateFlags::default()
    }
}

fn local_job(filename: &str) -> JobInfo {
    JobInfo {
        filename: Some(filename.to_string()),
        origin: Some(FileOrigin::Local),
        lines: Some(100),
        ..JobInfo::default()
    }
}

// ─────────────────────────────────────────────────────────
// Offline overlay lifecycle
// ─────────────────────────────────────────────────────────

#[test]
fn test_disconnect_event_raises_offline_overlay() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::Push(PushEvent::Disconnected));

    assert_eq!(state.offline, Some(OfflineNotice::Reconnecting));
    assert!(result.action.is_none());
}

#[test]
fn test_connect_event_clears_overlay_and_refreshes_timelapse() {
    let mut state = AppState::new();
    state.offline = Some(OfflineNotice::Reconnecting);

    let result = update(&mut state, Message::Push(PushEvent::Connected));

    assert_eq!(state.offline, None);
    assert!(matches!(
        result.action,
        Some(UpdateAction::SpawnTask(Task::FetchTimelapse))
    ));
}

#[test]
fn test_reconnect_failure_updates_overlay() {
    let mut state = AppState::new();
    state.offline = Some(OfflineNotice::Reconnecting);

    update(&mut state, Message::Push(PushEvent::ReconnectFailed));

    assert_eq!(state.offline, Some(OfflineNotice::GaveUp));
}

#[test]
fn test_offline_overlay_captures_keys() {
    let mut state = AppState::new();
    state.offline = Some(OfflineNotice::Reconnecting);

    assert!(matches!(
        handle_key(&state, InputKey::Char('r')),
        Some(Message::ReconnectChannel)
    ));
    assert!(matches!(handle_key(&state, InputKey::Char('q')), Some(Message::Quit)));
    // Panel keys are dead while the overlay is up.
    assert!(handle_key(&state, InputKey::Tab).is_none());
    assert!(handle_key(&state, InputKey::Enter).is_none());
}

#[test]
fn test_reconnect_key_produces_channel_action() {
    let mut state = AppState::new();
    state.offline = Some(OfflineNotice::GaveUp);

    let result = update(&mut state, Message::ReconnectChannel);
    assert!(matches!(result.action, Some(UpdateAction::ReconnectChannel)));
}

// ─────────────────────────────────────────────────────────
// Frame fan-out
// ─────────────────────────────────────────────────────────

#[test]
fn test_operational_frame_collapses_connection_panel() {
    let mut state = AppState::new();
    assert!(state.connection.panel_open);

    let result = update(&mut state, current_frame(payload_with_flags(operational_flags())));

    assert!(!state.connection.panel_open);
    assert!(state.flags.is_operational());
    // The webcam consumer refreshes the clip list on the transition.
    assert!(matches!(
        result.action,
        Some(UpdateAction::SpawnTask(Task::FetchTimelapse))
    ));
}

#[test]
fn test_steady_state_frame_spawns_nothing() {
    let mut state = AppState::new();
    update(&mut state, current_frame(payload_with_flags(operational_flags())));

    let result = update(&mut state, current_frame(payload_with_flags(operational_flags())));
    assert!(result.action.is_none());
}

#[test]
fn test_new_job_requests_gcode_download() {
    let mut state = AppState::new();
    // Flags settle first so only the gcode consumer queues work.
    update(&mut state, current_frame(payload_with_flags(operational_flags())));

    let mut payload = payload_with_flags(operational_flags());
    payload.job = local_job("benchy.gcode");
    let result = update(&mut state, current_frame(payload));

    match result.action {
        Some(UpdateAction::SpawnTask(Task::FetchGcodeFile { filename, .. })) => {
            assert_eq!(filename, "benchy.gcode");
        }
        other => panic!("expected gcode fetch, got {other:?}"),
    }
}

#[test]
fn test_transition_and_job_fan_out_in_order() {
    let mut state = AppState::new();

    let mut payload = payload_with_flags(operational_flags());
    payload.job = local_job("benchy.gcode");
    let result = update(&mut state, current_frame(payload));

    // Webcam runs before gcode in the fan-out order.
    match result.action {
        Some(UpdateAction::SpawnTasks(tasks)) => {
            assert_eq!(tasks.len(), 2);
            assert!(matches!(tasks[0], Task::FetchTimelapse));
            assert!(matches!(tasks[1], Task::FetchGcodeFile { .. }));
        }
        other => panic!("expected two tasks, got {other:?}"),
    }
}

#[test]
fn test_history_frame_replaces_wholesale() {
    let mut state = AppState::new();

    let mut live = payload_with_flags(StateFlags::default());
    live.logs = vec!["old line".to_string()];
    update(&mut state, current_frame(live));

    let mut replay = payload_with_flags(StateFlags::default());
    replay.log_history = Some(vec!["replayed".to_string()]);
    replay.temperature_history = Some(TemperatureSeries {
        actual: vec![(1_000, 21.0)],
        target: vec![(1_000, 0.0)],
        actual_bed: vec![(1_000, 20.0)],
        target_bed: vec![(1_000, 0.0)],
    });
    update(&mut state, history_frame(replay));

    assert_eq!(state.terminal.log, vec!["replayed"]);
    assert_eq!(state.temperature.series.actual.len(), 1);
}

// ─────────────────────────────────────────────────────────
// Key routing
// ─────────────────────────────────────────────────────────

#[test]
fn test_tab_key_cycles_panels() {
    let mut state = AppState::new();

    let result = update(&mut state, Message::Key(InputKey::Tab));
    assert!(matches!(result.message, Some(Message::NextTab)));

    update(&mut state, Message::NextTab);
    assert_eq!(state.active_tab, UiTab::Temperature);

    update(&mut state, Message::PrevTab);
    assert_eq!(state.active_tab, UiTab::Connection);
}

#[test]
fn test_quit_key_depends_on_tab() {
    let mut state = AppState::new();
    assert!(matches!(handle_key(&state, InputKey::Char('q')), Some(Message::Quit)));

    // The terminal's command field swallows plain characters.
    state.active_tab = UiTab::Terminal;
    assert!(matches!(
        handle_key(&state, InputKey::Char('q')),
        Some(Message::TerminalInputChar('q'))
    ));

    // Ctrl+C still quits there.
    assert!(matches!(handle_key(&state, InputKey::CharCtrl('c')), Some(Message::Quit)));
}

#[test]
fn test_jog_keys_carry_current_distance() {
    let mut state = AppState::new();
    state.active_tab = UiTab::Controls;
    state.controls.cycle_jog_distance();

    match handle_key(&state, InputKey::Up) {
        Some(Message::Jog { distance, .. }) => assert_eq!(distance, 10.0),
        other => panic!("expected jog, got {other:?}"),
    }
    match handle_key(&state, InputKey::Down) {
        Some(Message::Jog { distance, .. }) => assert_eq!(distance, -10.0),
        other => panic!("expected jog, got {other:?}"),
    }
}

#[test]
fn test_controls_editing_captures_characters() {
    let mut state = AppState::new();
    state.active_tab = UiTab::Controls;
    state.controls.set_controls(vec![ControlDefinition::ParametricCommand {
        name: "Extrude".into(),
        command: "G1 E%(amount)s".into(),
        input: vec![ControlInput {
            parameter: "amount".into(),
            name: "Amount".into(),
            default_value: serde_json::json!(5),
            value: serde_json::Value::Null,
        }],
    }]);
    state.controls.begin_edit();

    assert!(matches!(
        handle_key(&state, InputKey::Char('7')),
        Some(Message::ControlInputChar('7'))
    ));
    assert!(matches!(handle_key(&state, InputKey::Esc), Some(Message::ControlEditToggle)));
    // Jog arrows are disabled while editing.
    assert!(handle_key(&state, InputKey::Up).is_none());
}

#[test]
fn test_digit_key_jumps_to_page() {
    let mut state = AppState::new();
    state.active_tab = UiTab::Files;

    assert!(matches!(
        handle_key(&state, InputKey::Char('3')),
        Some(Message::FilesGotoPage(2))
    ));
}

// ─────────────────────────────────────────────────────────
// Message handling
// ─────────────────────────────────────────────────────────

#[test]
fn test_quit_message_sets_flag() {
    let mut state = AppState::new();
    update(&mut state, Message::Quit);
    assert!(state.should_quit());
}

#[test]
fn test_toggle_connection_uses_current_flags() {
    let mut state = AppState::new();

    // All-false flags: the link is considered up, so toggling disconnects.
    let result = update(&mut state, Message::ToggleConnection);
    assert!(matches!(
        result.action,
        Some(UpdateAction::SpawnTask(Task::DisconnectPrinter))
    ));

    let closed = StateFlags {
        closed_or_error: true,
        ..StateFlags::default()
    };
    update(&mut state, current_frame(payload_with_flags(closed)));
    state.connection.selected_port = Some("/dev/ttyUSB0".to_string());

    let result = update(&mut state, Message::ToggleConnection);
    match result.action {
        Some(UpdateAction::SpawnTask(Task::ConnectPrinter { port, .. })) => {
            assert_eq!(port.as_deref(), Some("/dev/ttyUSB0"));
        }
        other => panic!("expected connect, got {other:?}"),
    }
}

#[test]
fn test_terminal_send_ignores_empty_input() {
    let mut state = AppState::new();
    let result = update(&mut state, Message::TerminalSend);
    assert!(result.action.is_none());

    update(&mut state, Message::TerminalInputChar('G'));
    update(&mut state, Message::TerminalInputChar('2'));
    update(&mut state, Message::TerminalInputChar('8'));
    let result = update(&mut state, Message::TerminalSend);

    match result.action {
        Some(UpdateAction::SpawnTask(Task::SendCommand { command })) => {
            assert_eq!(command, "G28");
        }
        other => panic!("expected send command, got {other:?}"),
    }
    assert!(state.terminal.input.is_empty());
}

#[test]
fn test_gcode_download_roundtrip_through_messages() {
    let mut state = AppState::new();

    let mut payload = payload_with_flags(StateFlags::default());
    payload.job = local_job("benchy.gcode");
    let result = update(&mut state, current_frame(payload));

    let token = match result.action {
        Some(UpdateAction::SpawnTask(Task::FetchGcodeFile { token, .. })) => token,
        other => panic!("expected gcode fetch, got {other:?}"),
    };

    update(
        &mut state,
        Message::GcodeFileLoaded {
            token,
            filename: "benchy.gcode".to_string(),
            date: None,
            content: "G28\nG1 X10\n".to_string(),
        },
    );

    assert_eq!(state.gcode.loaded_filename.as_deref(), Some("benchy.gcode"));
    assert!(!state.gcode.is_loading());
}
