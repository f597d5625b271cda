//! Serial connection panel state.

use hostdeck_client::api::ConnectionOptions;
use hostdeck_core::push::StatusPayload;

use crate::handler::Task;

use super::{PushConsumer, UpdateCx};

/// View-model for the connect/disconnect panel.
///
/// Port and baudrate lists come from the host; the selection survives list
/// refreshes even when the selected entry disappears, matching the host's
/// own web UI.
#[derive(Debug, Default)]
pub struct ConnectionVm {
    pub ports: Vec<String>,
    pub baudrates: Vec<u32>,
    pub selected_port: Option<String>,
    pub selected_baudrate: Option<u32>,
    /// Ask the host to persist port/baudrate as its new defaults.
    pub save_settings: bool,
    /// Whether the panel is expanded. Collapses when the printer comes
    /// online, expands when it drops.
    pub panel_open: bool,
}

impl ConnectionVm {
    pub fn new() -> Self {
        Self {
            panel_open: true,
            ..Self::default()
        }
    }

    /// Apply a fresh options response from the host.
    ///
    /// The host's stored preferences only fill untouched selections, and
    /// only when the preferred entry is actually present in the list. The
    /// save checkbox resets with every refresh.
    pub fn apply_options(&mut self, options: ConnectionOptions) {
        if self.selected_port.is_none() {
            if let Some(preference) = &options.port_preference {
                if options.ports.iter().any(|p| p == preference) {
                    self.selected_port = Some(preference.clone());
                }
            }
        }
        if self.selected_baudrate.is_none() {
            if let Some(preference) = options.baudrate_preference {
                if options.baudrates.contains(&preference) {
                    self.selected_baudrate = Some(preference);
                }
            }
        }

        self.ports = options.ports;
        self.baudrates = options.baudrates;
        self.save_settings = false;
    }

    /// Advance the port selection, wrapping at the end of the list.
    pub fn cycle_port(&mut self) {
        self.selected_port = next_in_list(&self.ports, self.selected_port.as_ref()).cloned();
    }

    /// Advance the baudrate selection, wrapping at the end of the list.
    pub fn cycle_baudrate(&mut self) {
        self.selected_baudrate =
            next_in_list(&self.baudrates, self.selected_baudrate.as_ref()).copied();
    }

    pub fn toggle_save_settings(&mut self) {
        self.save_settings = !self.save_settings;
    }

    pub fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Label for the connect/disconnect action in the current state.
    pub fn connect_label(&self, closed_or_error: bool) -> &'static str {
        if closed_or_error {
            "Connect"
        } else {
            "Disconnect"
        }
    }

    /// The task behind the connect/disconnect toggle.
    ///
    /// Connecting sends the current selections (absent ones let the host
    /// pick); anything else asks the host to drop the serial link.
    pub fn toggle_connection_task(&self, closed_or_error: bool) -> Task {
        if closed_or_error {
            Task::ConnectPrinter {
                port: self.selected_port.clone(),
                baudrate: self.selected_baudrate,
                save: self.save_settings,
            }
        } else {
            Task::DisconnectPrinter
        }
    }
}

impl PushConsumer for ConnectionVm {
    fn apply_live_update(&mut self, _payload: &StatusPayload, cx: &mut UpdateCx<'_>) {
        // Fold the panel when the printer comes online, unfold when the
        // connection drops. Steady state leaves it however the user put it.
        match cx.flags().operational_changed() {
            Some(true) if self.panel_open => self.panel_open = false,
            Some(false) if !self.panel_open => self.panel_open = true,
            _ => {}
        }
    }
}

fn next_in_list<'a, T: PartialEq>(list: &'a [T], current: Option<&T>) -> Option<&'a T> {
    if list.is_empty() {
        return None;
    }
    let next = match current.and_then(|c| list.iter().position(|item| item == c)) {
        Some(index) => (index + 1) % list.len(),
        None => 0,
    };
    list.get(next)
}
