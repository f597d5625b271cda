//! Main TUI runner - entry point and event loop.
//!
//! Owns the application lifecycle: terminal setup, the push channel, the
//! unified message channel, and the loop that drives the TEA cycle
//! (message -> update -> action -> render).

use tokio::sync::mpsc;

use hostdeck_app::config::Settings;
use hostdeck_app::{actions, handler};
use hostdeck_app::{ApiClient, AppState, ChannelHandle, Message, PushChannel, UpdateAction};
use hostdeck_client::push_url;
use hostdeck_core::prelude::*;

use crate::{event, render, signals};

/// Capacity of the unified message channel. Task completions are small and
/// the loop drains continuously, so this never fills in practice.
const MSG_CHANNEL_CAPACITY: usize = 256;

/// Run the TUI against the host configured in `settings`.
pub async fn run(settings: Settings) -> Result<()> {
    install_panic_hook();

    let api = ApiClient::new(&settings.server.url, settings.server.api_key.as_deref())?;
    info!(url = %api.base(), "connecting to host");

    let mut channel = PushChannel::open(push_url(api.base())?);
    let channel_handle = channel.handle();

    let mut term = ratatui::init();
    let mut state = AppState::with_settings(settings);

    let (msg_tx, msg_rx) = mpsc::channel::<Message>(MSG_CHANNEL_CAPACITY);

    // Signal handler sends Message::Quit on SIGINT/SIGTERM.
    signals::spawn_signal_handler(msg_tx.clone());

    // Populate every panel before the first frame.
    actions::handle_action(
        UpdateAction::SpawnTasks(state.startup_tasks()),
        &api,
        &channel_handle,
        &msg_tx,
    );

    let result = run_loop(&mut term, &mut state, msg_rx, &mut channel, &msg_tx, &api);

    channel_handle.close().await;
    ratatui::restore();
    result
}

/// Main event loop.
fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    mut msg_rx: mpsc::Receiver<Message>,
    channel: &mut PushChannel,
    msg_tx: &mpsc::Sender<Message>,
    api: &ApiClient,
) -> Result<()> {
    let channel_handle = channel.handle();

    while !state.should_quit() {
        // Task completions and the signal handler.
        while let Ok(msg) = msg_rx.try_recv() {
            process_message(state, msg, api, &channel_handle, msg_tx);
        }

        // Push channel events (non-blocking).
        while let Ok(push) = channel.event_receiver().try_recv() {
            process_message(state, Message::Push(push), api, &channel_handle, msg_tx);
        }

        terminal.draw(|frame| render::view(frame, state))?;

        // Blocks up to the poll timeout, which paces the loop.
        if let Some(message) = event::poll()? {
            process_message(state, message, api, &channel_handle, msg_tx);
        }
    }

    Ok(())
}

/// Process a message through the TEA update function, following any chained
/// follow-up messages.
fn process_message(
    state: &mut AppState,
    message: Message,
    api: &ApiClient,
    channel: &ChannelHandle,
    msg_tx: &mpsc::Sender<Message>,
) {
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);
        if let Some(action) = result.action {
            actions::handle_action(action, api, channel, msg_tx);
        }
        msg = result.message;
    }
}

/// Restore the terminal before the default panic report prints, so the
/// message isn't lost to the alternate screen.
fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));
}
