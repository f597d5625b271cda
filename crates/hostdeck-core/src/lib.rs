//! # hostdeck-core - Core Domain Types
//!
//! Foundation crate for HostDeck. Provides the printer-host domain types,
//! push channel payloads, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`StateFlags`], [`PrinterState`] - Printer state as reported by the host
//! - [`JobInfo`], [`ProgressInfo`] - Selected job and print progress
//! - [`TemperatureSample`], [`TemperatureSeries`] - Hotend/bed readings
//! - [`GcodeFile`], [`FileOrigin`] - Host-side file listing entries
//! - [`ControlDefinition`], [`ControlInput`] - Custom controls tree
//! - [`TimelapseMode`], [`TimelapseFile`] - Timelapse configuration
//!
//! ### Push Channel (`push`)
//! - [`PushFrame`] - Parsed `current`/`history` frames from the status socket
//! - [`StatusPayload`] - The shared payload both frame kinds carry
//! - [`PushEvent`] - Frames plus connect/disconnect lifecycle events
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use hostdeck_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod push;
pub mod types;

/// Prelude for common imports used throughout all HostDeck crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use push::{parse_frame, PushEvent, PushFrame, StatusPayload};
pub use types::{
    ControlDefinition, ControlInput, FileOrigin, GcodeFile, GcodeProcessing, JobInfo, PrinterState,
    ProcessingMode, ProgressInfo, StateFlags, TempPoint, TemperatureSample, TemperatureSeries,
    TimelapseFile, TimelapseMode,
};
