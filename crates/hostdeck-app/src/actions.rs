//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every [`Task`] becomes one spawned tokio task wrapping one API call.
//! Fetches report back as `*Loaded` messages; command sends log failures and
//! otherwise trust the next status frame to show their effect, matching how
//! the host's own web UI behaves.

use tokio::sync::mpsc;

use hostdeck_client::{ApiClient, ChannelHandle};
use hostdeck_core::prelude::*;

use crate::handler::{Task, UpdateAction};
use crate::message::Message;

/// Execute an action by spawning background tasks for it.
pub fn handle_action(
    action: UpdateAction,
    api: &ApiClient,
    channel: &ChannelHandle,
    msg_tx: &mpsc::Sender<Message>,
) {
    match action {
        UpdateAction::SpawnTask(task) => spawn_task(task, api, msg_tx),

        UpdateAction::SpawnTasks(tasks) => {
            for task in tasks {
                spawn_task(task, api, msg_tx);
            }
        }

        UpdateAction::ReconnectChannel => {
            let channel = channel.clone();
            tokio::spawn(async move {
                if let Err(err) = channel.reconnect().await {
                    warn!(error = %err, "push channel reconnect request failed");
                }
            });
        }
    }
}

fn spawn_task(task: Task, api: &ApiClient, msg_tx: &mpsc::Sender<Message>) {
    let api = api.clone();
    let msg_tx = msg_tx.clone();
    tokio::spawn(async move {
        execute_task(task, api, msg_tx).await;
    });
}

/// Run one task to completion against the host API.
pub async fn execute_task(task: Task, api: ApiClient, msg_tx: mpsc::Sender<Message>) {
    match task {
        Task::FetchConnectionOptions => match api.connection_options().await {
            Ok(options) => send(&msg_tx, Message::ConnectionOptionsLoaded { options }).await,
            Err(err) => warn!(error = %err, "fetching connection options failed"),
        },

        Task::ConnectPrinter { port, baudrate, save } => {
            info!(?port, ?baudrate, save, "connecting printer");
            if let Err(err) = api.connect_printer(port.as_deref(), baudrate, save).await {
                warn!(error = %err, "connect request failed");
            }
        }

        Task::DisconnectPrinter => {
            info!("disconnecting printer");
            if let Err(err) = api.disconnect_printer().await {
                warn!(error = %err, "disconnect request failed");
            }
            // The option lists can change while the link is down, so follow
            // up with a fresh fetch either way.
            match api.connection_options().await {
                Ok(options) => send(&msg_tx, Message::ConnectionOptionsLoaded { options }).await,
                Err(err) => warn!(error = %err, "fetching connection options failed"),
            }
        }

        Task::FetchControls => match api.custom_controls().await {
            Ok(controls) => send(&msg_tx, Message::ControlsLoaded { controls }).await,
            Err(err) => warn!(error = %err, "fetching custom controls failed"),
        },

        Task::Jog { axis, distance } => {
            if let Err(err) = api.jog(axis, distance).await {
                warn!(error = %err, "jog request failed");
            }
        }

        Task::Home { axis } => {
            if let Err(err) = api.home(axis).await {
                warn!(error = %err, "home request failed");
            }
        }

        Task::SendCommand { command } => {
            if let Err(err) = api.send_command(&command).await {
                warn!(error = %err, "command send failed");
            }
        }

        Task::SendParametricCommand { command, parameters } => {
            if let Err(err) = api.send_parametric_command(&command, &parameters).await {
                warn!(error = %err, "parametric command send failed");
            }
        }

        Task::StartPrint => {
            if let Err(err) = api.start_print().await {
                warn!(error = %err, "print start failed");
            }
        }

        Task::PausePrint => {
            if let Err(err) = api.pause_print().await {
                warn!(error = %err, "print pause failed");
            }
        }

        Task::CancelPrint => {
            if let Err(err) = api.cancel_print().await {
                warn!(error = %err, "print cancel failed");
            }
        }

        Task::SetHotendTemperature { celsius } => {
            if let Err(err) = api.set_hotend_temperature(celsius).await {
                warn!(error = %err, "hotend target send failed");
            }
        }

        Task::SetBedTemperature { celsius } => {
            if let Err(err) = api.set_bed_temperature(celsius).await {
                warn!(error = %err, "bed target send failed");
            }
        }

        Task::FetchSpeed => match api.speed().await {
            Ok(response) => {
                let feedrates = response.feedrate;
                send(&msg_tx, Message::SpeedLoaded { feedrates }).await
            }
            Err(err) => warn!(error = %err, "fetching feedrates failed"),
        },

        Task::SetSpeed { structure, value } => match api.set_speed(structure, value).await {
            // The response carries the host's view of all four structures.
            Ok(response) => {
                let feedrates = response.feedrate;
                send(&msg_tx, Message::SpeedLoaded { feedrates }).await
            }
            Err(err) => warn!(error = %err, "feedrate send failed"),
        },

        Task::FetchFiles => match api.gcode_files().await {
            Ok(listing) => send(&msg_tx, Message::FilesLoaded { listing }).await,
            Err(err) => warn!(error = %err, "fetching file listing failed"),
        },

        Task::LoadFile { filename } => {
            if let Err(err) = api.load_file(&filename).await {
                warn!(error = %err, filename, "file load failed");
            }
        }

        Task::DeleteFile { filename } => match api.delete_file(&filename).await {
            // Deletion returns the refreshed listing.
            Ok(listing) => send(&msg_tx, Message::FilesLoaded { listing }).await,
            Err(err) => warn!(error = %err, filename, "file delete failed"),
        },

        Task::FetchTimelapse => match api.timelapse().await {
            Ok(response) => send(&msg_tx, Message::TimelapseLoaded { response }).await,
            Err(err) => warn!(error = %err, "fetching timelapse failed"),
        },

        Task::SaveTimelapseConfig { mode, interval } => {
            match api.save_timelapse_config(mode, interval).await {
                Ok(response) => send(&msg_tx, Message::TimelapseLoaded { response }).await,
                Err(err) => warn!(error = %err, "timelapse config save failed"),
            }
        }

        Task::DeleteTimelapse { filename } => {
            if let Err(err) = api.delete_timelapse(&filename).await {
                warn!(error = %err, filename, "timelapse delete failed");
                return;
            }
            // No listing in the delete response; fetch the new state.
            match api.timelapse().await {
                Ok(response) => send(&msg_tx, Message::TimelapseLoaded { response }).await,
                Err(err) => warn!(error = %err, "fetching timelapse failed"),
            }
        }

        Task::FetchGcodeFile { token, filename, date } => {
            match api.download_gcode(&filename, date).await {
                Ok(content) => {
                    let msg = Message::GcodeFileLoaded {
                        token,
                        filename,
                        date,
                        content,
                    };
                    send(&msg_tx, msg).await
                }
                Err(err) => {
                    warn!(error = %err, filename, "gcode download failed");
                    send(&msg_tx, Message::GcodeFileFailed { token }).await;
                }
            }
        }
    }
}

async fn send(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("message channel closed, dropping task result");
    }
}
