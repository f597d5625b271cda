//! Async WebSocket client for the host's status push socket.
//!
//! The [`PushChannel`] owns a background task that keeps a WebSocket to the
//! host alive, parses the `current`/`history` status frames, and forwards
//! them (plus connect/disconnect lifecycle) as
//! [`PushEvent`](hostdeck_core::PushEvent)s over an mpsc channel.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       PushChannel                          │
//! │                                                            │
//! │  ┌──────────────┐        ┌─────────────────────────────┐   │
//! │  │  Public API  │        │   Background Task           │   │
//! │  │              │        │                             │   │
//! │  │ reconnect()──┼──cmd──▶│  connect / read loop /      │   │
//! │  │ close()      │  chan  │  backoff reconnect          │   │
//! │  │              │        │                             │   │
//! │  │ events()   ◀─┼──evt──◀│  frame → PushEvent::Frame   │   │
//! │  └──────────────┘  chan  └─────────────────────────────┘   │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Connection loss is not an error from the application's point of view: the
//! task emits [`PushEvent::Disconnected`], retries with exponential backoff,
//! and emits [`PushEvent::ReconnectFailed`] once the attempt budget is
//! exhausted. A manual [`ChannelHandle::reconnect`] skips any pending backoff
//! and restarts a channel that has given up.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use hostdeck_core::prelude::*;
use hostdeck_core::push::{parse_frame, PushEvent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Initial reconnection backoff duration.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum reconnection backoff duration (cap).
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Maximum number of consecutive reconnection attempts before giving up.
const MAX_RECONNECT_ATTEMPTS: u32 = 10;

/// Capacity of the command channel.
const CMD_CHANNEL_CAPACITY: usize = 8;

/// Capacity of the event channel (bounded, status frames can be bursty).
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Current connection state of a [`PushChannel`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Not connected and not attempting to connect.
    Disconnected,
    /// Initial connection attempt in progress.
    Connecting,
    /// Connected and receiving frames.
    Connected,
    /// Connection lost; background task is retrying.
    Reconnecting {
        /// The current reconnection attempt number (1-indexed).
        attempt: u32,
    },
}

/// Derive the push socket URL from the host base URL.
///
/// `http` maps to `ws`, `https` to `wss`; the socket lives at `push` under
/// the host root (next to the `ajax/` API prefix).
pub fn push_url(base: &Url) -> Result<Url> {
    let mut url = base
        .join("push")
        .map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Ok(url),
        other => {
            return Err(Error::InvalidUrl(format!(
                "{base}: unsupported scheme {other}"
            )))
        }
    };
    url.set_scheme(scheme)
        .map_err(|_| Error::InvalidUrl(base.to_string()))?;
    Ok(url)
}

// ---------------------------------------------------------------------------
// Internal command type
// ---------------------------------------------------------------------------

/// Messages sent from the public API to the background task.
enum ChannelCommand {
    /// Retry immediately: skip any pending backoff sleep, reset the attempt
    /// budget, and restart a channel that has given up.
    Reconnect,
    /// Gracefully close the socket and stop the background task.
    Close,
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

// ---------------------------------------------------------------------------
// PushChannel
// ---------------------------------------------------------------------------

/// A clonable handle for controlling the push channel.
///
/// The handle becomes inoperable when the [`PushChannel`] (or its background
/// task) is dropped — commands will return [`Error::ChannelClosed`].
#[derive(Clone)]
pub struct ChannelHandle {
    cmd_tx: mpsc::Sender<ChannelCommand>,
    state: Arc<std::sync::RwLock<ConnectionState>>,
}

impl std::fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner()).clone();
        f.debug_struct("ChannelHandle")
            .field("connection_state", &state)
            .finish()
    }
}

impl ChannelHandle {
    /// Ask the background task to reconnect right now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if the background task has exited.
    pub async fn reconnect(&self) -> Result<()> {
        self.cmd_tx
            .send(ChannelCommand::Reconnect)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Gracefully close the socket and stop the background task.
    pub async fn close(&self) {
        // Ignore the send error — if the channel is already closed the task
        // has already exited.
        let _ = self.cmd_tx.send(ChannelCommand::Close).await;
    }

    /// Return the current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Return `true` if the socket is currently connected.
    pub fn is_connected(&self) -> bool {
        *self.state.read().unwrap_or_else(|e| e.into_inner()) == ConnectionState::Connected
    }
}

/// WebSocket client for the host's status push socket.
///
/// Create with [`PushChannel::open`] (requires a running Tokio runtime),
/// then drain [`event_receiver`](PushChannel::event_receiver) from the
/// application loop. The background task cleans up automatically when the
/// `PushChannel` is dropped: the command channel closes, which signals the
/// task to exit.
pub struct PushChannel {
    handle: ChannelHandle,
    event_rx: mpsc::Receiver<PushEvent>,
}

impl PushChannel {
    /// Spawn the background task and start connecting to `url`.
    ///
    /// Returns immediately; an unreachable host is reported as
    /// [`PushEvent::Disconnected`] followed by automatic retries, the same
    /// as a connection lost later.
    pub fn open(url: Url) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ChannelCommand>(CMD_CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel::<PushEvent>(EVENT_CHANNEL_CAPACITY);
        let state = Arc::new(std::sync::RwLock::new(ConnectionState::Connecting));

        tokio::spawn(run_channel_task(url, cmd_rx, event_tx, Arc::clone(&state)));

        Self {
            handle: ChannelHandle { cmd_tx, state },
            event_rx,
        }
    }

    /// Create a clonable control handle for this channel.
    pub fn handle(&self) -> ChannelHandle {
        self.handle.clone()
    }

    /// Return a mutable reference to the event receiver.
    ///
    /// Callers can `recv()` or `try_recv()` on this to consume status frames
    /// and lifecycle events.
    pub fn event_receiver(&mut self) -> &mut mpsc::Receiver<PushEvent> {
        &mut self.event_rx
    }

    /// Return the current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.handle.connection_state()
    }

    /// Return `true` if the socket is currently connected.
    pub fn is_connected(&self) -> bool {
        self.handle.is_connected()
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Outcome of one connection's I/O loop.
enum LoopExit {
    /// Connection dropped unexpectedly; the caller should reconnect.
    Lost,
    /// The user asked for a fresh connection; redial without backoff.
    Redial,
    /// Close command received or all handles dropped; terminate the task.
    Shutdown,
}

/// Entry point for the background socket task.
///
/// Owns the connect/reconnect lifecycle: dial, run the I/O loop, back off
/// and retry on loss, give up after [`MAX_RECONNECT_ATTEMPTS`] and then wait
/// for a manual reconnect.
async fn run_channel_task(
    url: Url,
    mut cmd_rx: mpsc::Receiver<ChannelCommand>,
    event_tx: mpsc::Sender<PushEvent>,
    state: Arc<std::sync::RwLock<ConnectionState>>,
) {
    // 0 means "connect now" (initial attempt or manual reconnect); positive
    // values count consecutive failed attempts and set the backoff.
    let mut attempt: u32 = 0;

    loop {
        set_state(
            &state,
            if attempt == 0 {
                ConnectionState::Connecting
            } else {
                ConnectionState::Reconnecting { attempt }
            },
        );

        match connect_ws(&url).await {
            Ok(ws_stream) => {
                if attempt > 0 {
                    info!("push channel: reconnected (attempt {})", attempt);
                } else {
                    info!("push channel: connected to {}", url);
                }
                set_state(&state, ConnectionState::Connected);
                if event_tx.send(PushEvent::Connected).await.is_err() {
                    return;
                }
                attempt = 0;

                match run_io_loop(ws_stream, &mut cmd_rx, &event_tx).await {
                    LoopExit::Lost => {
                        if event_tx.send(PushEvent::Disconnected).await.is_err() {
                            return;
                        }
                        attempt = 1;
                    }
                    LoopExit::Redial => {
                        // around the loop again with attempt == 0
                    }
                    LoopExit::Shutdown => {
                        set_state(&state, ConnectionState::Disconnected);
                        debug!("push channel background task exiting");
                        return;
                    }
                }
            }
            Err(err) => {
                if attempt == 0 {
                    warn!("push channel: connection to {} failed: {}", url, err);
                    if event_tx.send(PushEvent::Disconnected).await.is_err() {
                        return;
                    }
                    attempt = 1;
                } else {
                    warn!(
                        "push channel: reconnection attempt {} failed: {}",
                        attempt, err
                    );
                    attempt += 1;
                }
            }
        }

        if attempt > MAX_RECONNECT_ATTEMPTS {
            error!(
                "push channel: exceeded {} reconnection attempts, giving up",
                MAX_RECONNECT_ATTEMPTS
            );
            set_state(&state, ConnectionState::Disconnected);
            if event_tx.send(PushEvent::ReconnectFailed).await.is_err() {
                return;
            }

            // Idle until the user asks for a manual reconnect.
            loop {
                match cmd_rx.recv().await {
                    Some(ChannelCommand::Reconnect) => break,
                    Some(ChannelCommand::Close) | None => {
                        debug!("push channel background task exiting");
                        return;
                    }
                }
            }
            attempt = 0;
            continue;
        }

        if attempt > 0 {
            let backoff = compute_backoff(attempt);
            warn!(
                "push channel: retrying in {:?} (attempt {}/{})",
                backoff, attempt, MAX_RECONNECT_ATTEMPTS
            );

            // Race the sleep against user commands so a manual reconnect
            // doesn't have to wait out the backoff.
            tokio::select! {
                _ = tokio::time::sleep(backoff) => {}
                cmd = cmd_rx.recv() => match cmd {
                    Some(ChannelCommand::Reconnect) => {
                        debug!("push channel: manual reconnect, skipping backoff");
                        attempt = 0;
                    }
                    Some(ChannelCommand::Close) | None => {
                        set_state(&state, ConnectionState::Disconnected);
                        debug!("push channel background task exiting");
                        return;
                    }
                },
            }
        }
    }
}

/// Run one connection's read/command select loop.
async fn run_io_loop(
    ws_stream: WsStream,
    cmd_rx: &mut mpsc::Receiver<ChannelCommand>,
    event_tx: &mpsc::Sender<PushEvent>,
) -> LoopExit {
    let (mut ws_sink, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            // ── Incoming WebSocket message ───────────────────────────────
            frame = ws_read.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        handle_ws_text(text.as_str(), event_tx);
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("push channel: received Close frame");
                        return LoopExit::Lost;
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong/Binary — ignore
                    }
                    Some(Err(err)) => {
                        warn!("push channel: WebSocket read error: {}", err);
                        return LoopExit::Lost;
                    }
                    None => {
                        debug!("push channel: WebSocket stream ended");
                        return LoopExit::Lost;
                    }
                }
            }

            // ── Command from the public API ──────────────────────────────
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(ChannelCommand::Reconnect) => {
                        debug!("push channel: manual reconnect while connected, redialing");
                        send_close(&mut ws_sink).await;
                        return LoopExit::Redial;
                    }
                    Some(ChannelCommand::Close) => {
                        send_close(&mut ws_sink).await;
                        return LoopExit::Shutdown;
                    }
                    None => {
                        // The PushChannel was dropped — close gracefully.
                        debug!("push channel: command channel closed, shutting down");
                        send_close(&mut ws_sink).await;
                        return LoopExit::Shutdown;
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Establish a new WebSocket connection to `url`.
async fn connect_ws(url: &Url) -> Result<WsStream> {
    let (ws_stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|err| Error::channel(format!("failed to connect to {url}: {err}")))?;
    Ok(ws_stream)
}

/// Compute exponential backoff duration for reconnection attempt `n`.
///
/// The formula is `INITIAL_BACKOFF * 2^(n-1)`, capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    // 2^(attempt-1), capped to avoid overflow.
    // checked_shl returns None if the shift amount >= 64 (or would overflow).
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}

/// Parse an incoming text frame and forward it to the event channel.
///
/// Status frames are droppable under backpressure (the next one supersedes
/// them), so this uses `try_send`; lifecycle events elsewhere use a blocking
/// send because the overlay state machine must see every transition.
fn handle_ws_text(text: &str, event_tx: &mpsc::Sender<PushEvent>) {
    match parse_frame(text) {
        Ok(Some(frame)) => {
            if let Err(err) = event_tx.try_send(PushEvent::Frame(frame)) {
                warn!(
                    "push channel: event channel full or closed, dropping frame: {}",
                    err
                );
            }
        }
        Ok(None) => {}
        Err(err) => {
            warn!("push channel: ignoring malformed frame: {}", err);
        }
    }
}

/// Send a WebSocket Close frame, ignoring any write errors.
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

fn set_state(state: &Arc<std::sync::RwLock<ConnectionState>>, value: ConnectionState) {
    let mut guard = state.write().unwrap_or_else(|e| e.into_inner());
    *guard = value;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
