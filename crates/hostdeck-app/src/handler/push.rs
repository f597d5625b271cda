//! Push channel event handling and status frame fan-out.
//!
//! Frames fan out to the view-models in one fixed order (connection,
//! printer, temperature, controls, speed, terminal, webcam, gcode), after
//! the shared flags have been applied, so every consumer sees the same
//! complete transition. The files panel is request/response only and takes
//! no frames.

use hostdeck_core::prelude::*;
use hostdeck_core::push::{PushEvent, PushFrame};

use crate::state::{AppState, OfflineNotice};
use crate::viewmodel::{PushConsumer, UpdateCx};

use super::{Task, UpdateAction, UpdateResult};

/// Handle a push channel event: lifecycle edges drive the offline overlay,
/// frames fan out to the view-models.
pub(crate) fn handle_push_event(state: &mut AppState, event: PushEvent) -> UpdateResult {
    match event {
        PushEvent::Connected => {
            info!("push channel connected");
            state.offline = None;
            // The clip list may have changed while we were away.
            UpdateResult::action(UpdateAction::SpawnTask(Task::FetchTimelapse))
        }
        PushEvent::Disconnected => {
            warn!("push channel lost, reconnecting");
            state.offline = Some(OfflineNotice::Reconnecting);
            UpdateResult::none()
        }
        PushEvent::ReconnectFailed => {
            error!("push channel reconnection gave up");
            state.offline = Some(OfflineNotice::GaveUp);
            UpdateResult::none()
        }
        PushEvent::Frame(frame) => apply_frame(state, &frame),
    }
}

/// Fan one status frame out to every consuming view-model.
pub(crate) fn apply_frame(state: &mut AppState, frame: &PushFrame) -> UpdateResult {
    let AppState {
        flags,
        connection,
        printer,
        temperature,
        controls,
        speed,
        terminal,
        webcam,
        gcode,
        ..
    } = state;

    let payload = frame.payload();
    flags.apply(&payload.state);

    let mut cx = UpdateCx::new(flags);
    let consumers: [&mut dyn PushConsumer; 8] = [
        connection,
        printer,
        temperature,
        controls,
        speed,
        terminal,
        webcam,
        gcode,
    ];

    if frame.is_history() {
        for consumer in consumers {
            consumer.apply_snapshot_replay(payload, &mut cx);
        }
    } else {
        for consumer in consumers {
            consumer.apply_live_update(payload, &mut cx);
        }
    }

    UpdateResult::tasks(cx.into_tasks())
}
