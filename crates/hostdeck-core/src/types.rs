//! Domain types for the printer host's wire format
//!
//! Everything here deserializes from the host's camelCase JSON. The host is
//! authoritative for all of it: the client renders these values and never
//! derives printer state on its own.

use serde::Deserialize;

/// Printer state flags as reported by the host.
///
/// The flags are not mutually exclusive and the client does not enforce any
/// cross-flag invariants; whatever combination the host sends is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateFlags {
    pub operational: bool,
    pub printing: bool,
    pub paused: bool,
    pub closed_or_error: bool,
    pub error: bool,
    pub ready: bool,
    pub loading: bool,
}

/// Printer state block of a status payload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinterState {
    pub state_string: Option<String>,
    pub flags: StateFlags,
}

/// Currently selected print job.
///
/// An absent `filename` means no job is loaded. The formatted fields
/// (`estimated_print_time`, `filament`) arrive pre-rendered by the host and
/// are displayed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobInfo {
    pub filename: Option<String>,
    pub origin: Option<FileOrigin>,
    pub date: Option<i64>,
    pub lines: Option<u64>,
    pub estimated_print_time: Option<String>,
    pub filament: Option<String>,
}

/// Print progress block of a status payload.
///
/// `progress` is the current G-code line number; time strings arrive
/// pre-formatted by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressInfo {
    pub progress: Option<u64>,
    pub print_time: Option<String>,
    pub print_time_left: Option<String>,
}

/// Server-side file processing phase reported while the `loading` flag is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Loading,
    Parsing,
    #[serde(other)]
    Other,
}

/// The `gcode` sub-payload: progress of server-side file loading/parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcodeProcessing {
    pub mode: Option<ProcessingMode>,
    /// Fraction in `0.0..=1.0`
    pub progress: Option<f64>,
}

/// One temperature reading. `current_time` is epoch milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemperatureSample {
    pub current_time: i64,
    pub temp: f64,
    pub target_temp: f64,
    pub bed_temp: f64,
    pub target_bed_temp: f64,
}

/// A single plotted point: (epoch milliseconds, degrees celsius)
pub type TempPoint = (i64, f64);

/// The four temperature series as sent in a history replay.
///
/// This doubles as the client-side series cache: live samples are appended
/// to it, history frames replace it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemperatureSeries {
    pub actual: Vec<TempPoint>,
    pub target: Vec<TempPoint>,
    pub actual_bed: Vec<TempPoint>,
    pub target_bed: Vec<TempPoint>,
}

/// Storage location of a G-code file on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrigin {
    Local,
    Sdcard,
}

impl FileOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOrigin::Local => "local",
            FileOrigin::Sdcard => "sdcard",
        }
    }
}

/// One entry of the host's G-code file listing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcodeFile {
    pub name: String,
    #[serde(default)]
    pub origin: Option<FileOrigin>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub date: Option<i64>,
}

/// Timelapse capture mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelapseMode {
    #[default]
    Off,
    Timed,
    Zchange,
}

impl TimelapseMode {
    /// Wire value, also used as the display label
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelapseMode::Off => "off",
            TimelapseMode::Timed => "timed",
            TimelapseMode::Zchange => "zchange",
        }
    }
}

/// One rendered timelapse clip on the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelapseFile {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub date: Option<i64>,
}

/// A node of the host-defined custom controls tree.
///
/// The tree arrives once from the host and is polymorphic on `type`.
/// Unrecognized node types collapse into [`ControlDefinition::Unknown`] so a
/// host with newer control kinds doesn't break the whole tree; those nodes
/// render as nothing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlDefinition {
    Section {
        name: String,
        #[serde(default)]
        children: Vec<ControlDefinition>,
    },
    Command {
        name: String,
        command: String,
    },
    ParametricCommand {
        name: String,
        command: String,
        #[serde(default)]
        input: Vec<ControlInput>,
    },
    #[serde(other)]
    Unknown,
}

impl ControlDefinition {
    /// Display name, empty for unknown nodes
    pub fn name(&self) -> &str {
        match self {
            ControlDefinition::Section { name, .. } => name,
            ControlDefinition::Command { name, .. } => name,
            ControlDefinition::ParametricCommand { name, .. } => name,
            ControlDefinition::Unknown => "",
        }
    }
}

/// One parameter of a parametric custom command.
///
/// `value` is the live, user-editable slot; it starts out seeded from
/// `default_value` when the tree is ingested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlInput {
    pub parameter: String,
    pub name: String,
    #[serde(rename = "default")]
    pub default_value: serde_json::Value,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ControlInput {
    /// Text form of the live value, for editing and form submission.
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_flags_deserialize_camel_case() {
        let json = json!({
            "operational": true,
            "printing": false,
            "paused": false,
            "closedOrError": false,
            "error": false,
            "ready": true,
            "loading": false
        });
        let flags: StateFlags = serde_json::from_value(json).unwrap();
        assert!(flags.operational);
        assert!(flags.ready);
        assert!(!flags.closed_or_error);
    }

    #[test]
    fn test_state_flags_missing_fields_default_false() {
        let flags: StateFlags = serde_json::from_value(json!({"operational": true})).unwrap();
        assert!(flags.operational);
        assert!(!flags.printing);
        assert!(!flags.loading);
    }

    #[test]
    fn test_job_info_deserialize() {
        let json = json!({
            "filename": "whistle.gcode",
            "origin": "local",
            "date": 1371117400,
            "lines": 8512,
            "estimatedPrintTime": "00:23:00",
            "filament": "1.20m"
        });
        let job: JobInfo = serde_json::from_value(json).unwrap();
        assert_eq!(job.filename.as_deref(), Some("whistle.gcode"));
        assert_eq!(job.origin, Some(FileOrigin::Local));
        assert_eq!(job.lines, Some(8512));
    }

    #[test]
    fn test_empty_job_means_no_job_loaded() {
        let job: JobInfo = serde_json::from_value(json!({})).unwrap();
        assert!(job.filename.is_none());
        assert!(job.lines.is_none());
    }

    #[test]
    fn test_temperature_series_from_pairs() {
        let json = json!({
            "actual": [[1371117400000i64, 21.3], [1371117401000i64, 21.5]],
            "target": [[1371117400000i64, 0.0]],
            "actualBed": [],
            "targetBed": []
        });
        let series: TemperatureSeries = serde_json::from_value(json).unwrap();
        assert_eq!(series.actual.len(), 2);
        assert_eq!(series.actual[1], (1371117401000, 21.5));
        assert!(series.target_bed.is_empty());
    }

    #[test]
    fn test_control_definition_tagging() {
        let json = json!([
            {"type": "section", "name": "Movement", "children": [
                {"type": "command", "name": "Motors off", "command": "M18"}
            ]},
            {"type": "parametric_command", "name": "Extrude", "command": "G1 E%(amount)s",
             "input": [{"parameter": "amount", "name": "Amount", "default": 5}]}
        ]);
        let controls: Vec<ControlDefinition> = serde_json::from_value(json).unwrap();
        assert_eq!(controls.len(), 2);
        match &controls[0] {
            ControlDefinition::Section { name, children } => {
                assert_eq!(name, "Movement");
                assert!(matches!(children[0], ControlDefinition::Command { .. }));
            }
            other => panic!("expected section, got {other:?}"),
        }
        match &controls[1] {
            ControlDefinition::ParametricCommand { input, .. } => {
                assert_eq!(input[0].parameter, "amount");
                assert_eq!(input[0].default_value, json!(5));
                // live value is only seeded during ingestion, not by serde
                assert_eq!(input[0].value, serde_json::Value::Null);
            }
            other => panic!("expected parametric command, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_control_type_tolerated() {
        let json = json!({"type": "fancy_widget", "name": "Future"});
        let control: ControlDefinition = serde_json::from_value(json).unwrap();
        assert!(matches!(control, ControlDefinition::Unknown));
        assert_eq!(control.name(), "");
    }

    #[test]
    fn test_processing_mode_values() {
        let gcode: GcodeProcessing =
            serde_json::from_value(json!({"mode": "loading", "progress": 0.42})).unwrap();
        assert_eq!(gcode.mode, Some(ProcessingMode::Loading));

        let gcode: GcodeProcessing =
            serde_json::from_value(json!({"mode": "compressing", "progress": 0.1})).unwrap();
        assert_eq!(gcode.mode, Some(ProcessingMode::Other));
    }

    #[test]
    fn test_timelapse_mode_round_trip_labels() {
        let mode: TimelapseMode = serde_json::from_value(json!("zchange")).unwrap();
        assert_eq!(mode, TimelapseMode::Zchange);
        assert_eq!(mode.as_str(), "zchange");
    }
}
