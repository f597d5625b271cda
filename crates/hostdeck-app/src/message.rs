//! Message types for the application (TEA pattern)

use hostdeck_client::api::{ConnectionOptions, Feedrates, FileListing, JogAxis, TimelapseResponse};
use hostdeck_core::push::PushEvent;
use hostdeck_core::types::ControlDefinition;

use crate::gcode_render::ViewerToggle;
use crate::input_key::InputKey;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Event from the push channel (lifecycle or status frame)
    Push(PushEvent),

    /// Tick event for periodic updates
    Tick,

    /// Quit the application
    Quit,

    /// Switch to the next panel tab
    NextTab,

    /// Switch to the previous panel tab
    PrevTab,

    /// Force the push channel to redial immediately
    ReconnectChannel,

    // ─────────────────────────────────────────────────────────
    // Connection Messages
    // ─────────────────────────────────────────────────────────
    /// Expand/collapse the connection panel
    ToggleConnectionPanel,

    /// Cycle the serial port selection
    CyclePort,

    /// Cycle the baudrate selection
    CycleBaud,

    /// Flip the "save as host default" checkbox
    ToggleSaveSettings,

    /// Connect or disconnect, depending on the current state
    ToggleConnection,

    /// Port/baudrate options arrived from the host
    ConnectionOptionsLoaded { options: ConnectionOptions },

    // ─────────────────────────────────────────────────────────
    // Job Messages
    // ─────────────────────────────────────────────────────────
    /// Start printing the loaded job
    StartPrint,

    /// Pause or resume the running job
    PausePrint,

    /// Cancel the running job
    CancelPrint,

    // ─────────────────────────────────────────────────────────
    // Temperature Messages
    // ─────────────────────────────────────────────────────────
    /// Move focus between the hotend and bed target inputs
    TempFocusNext,

    /// Nudge the focused target input by `delta` degrees
    TempAdjust { delta: i32 },

    /// Send the focused target to the printer
    TempSend,

    // ─────────────────────────────────────────────────────────
    // Controls Messages
    // ─────────────────────────────────────────────────────────
    /// Move the controls cursor up
    ControlUp,

    /// Move the controls cursor down
    ControlDown,

    /// Fire the control under the cursor
    ControlActivate,

    /// Enter/leave input editing on a parametric command
    ControlEditToggle,

    /// Focus the next input of the edited command
    ControlInputNext,

    /// Focus the previous input of the edited command
    ControlInputPrev,

    /// Type into the focused input
    ControlInputChar(char),

    /// Delete from the focused input
    ControlInputBackspace,

    /// Cycle the jog step size
    CycleJogDistance,

    /// Jog one axis by a signed distance in mm
    Jog { axis: JogAxis, distance: f64 },

    /// Home one axis
    Home { axis: JogAxis },

    /// Custom controls tree arrived from the host
    ControlsLoaded { controls: Vec<ControlDefinition> },

    // ─────────────────────────────────────────────────────────
    // Speed Messages
    // ─────────────────────────────────────────────────────────
    /// Cycle which feedrate structure the input applies to
    CycleSpeedField,

    /// Nudge the speed input
    SpeedAdjust { delta: i32 },

    /// Send the speed input for the selected structure
    SpeedSend,

    /// Feedrates arrived from the host (`None` clears the panel)
    SpeedLoaded { feedrates: Option<Feedrates> },

    // ─────────────────────────────────────────────────────────
    // Terminal Messages
    // ─────────────────────────────────────────────────────────
    /// Type into the command field
    TerminalInputChar(char),

    /// Delete from the command field
    TerminalInputBackspace,

    /// Clear the command field
    TerminalInputClear,

    /// Send the entered command
    TerminalSend,

    /// Flip tail-following of the log
    ToggleAutoScroll,

    /// Scroll the log by `delta` lines
    TerminalScroll { delta: i32 },

    /// Jump to the top of the log
    TerminalScrollTop,

    /// Jump back to the tail of the log
    TerminalScrollBottom,

    // ─────────────────────────────────────────────────────────
    // Files Messages
    // ─────────────────────────────────────────────────────────
    /// Move the file selection up
    FilesUp,

    /// Move the file selection down
    FilesDown,

    /// Previous page of the listing
    FilesPrevPage,

    /// Next page of the listing
    FilesNextPage,

    /// Jump to a page by index
    FilesGotoPage(usize),

    /// Load the selected file as the active job
    FileLoad,

    /// Delete the selected file from the host
    FileDelete,

    /// Re-fetch the file listing
    FilesRefresh,

    /// File listing arrived from the host
    FilesLoaded { listing: FileListing },

    // ─────────────────────────────────────────────────────────
    // Webcam / Timelapse Messages
    // ─────────────────────────────────────────────────────────
    /// Move the clip selection up
    TimelapseUp,

    /// Move the clip selection down
    TimelapseDown,

    /// Cycle the capture mode
    CycleTimelapseMode,

    /// Nudge the timed capture interval by `delta` seconds
    AdjustTimelapseInterval { delta: i32 },

    /// Save the capture configuration to the host
    SaveTimelapseConfig,

    /// Delete the selected clip from the host
    TimelapseDelete,

    /// Re-fetch the timelapse state
    TimelapseRefresh,

    /// Timelapse state arrived from the host
    TimelapseLoaded { response: TimelapseResponse },

    // ─────────────────────────────────────────────────────────
    // G-code Viewer Messages
    // ─────────────────────────────────────────────────────────
    /// Flip one viewer option
    GcodeToggleOption(ViewerToggle),

    /// Flip following of live print progress
    GcodeToggleSync,

    /// Step one layer up
    GcodeLayerNext,

    /// Step one layer down
    GcodeLayerPrev,

    /// Re-arm auto-loading after repeated failures
    GcodeRefresh,

    /// A G-code download finished
    GcodeFileLoaded {
        token: u64,
        filename: String,
        date: Option<i64>,
        content: String,
    },

    /// A G-code download failed
    GcodeFileFailed { token: u64 },
}
