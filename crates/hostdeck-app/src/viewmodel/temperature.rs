//! Temperature panel state: live readouts, plot series, target inputs.

use hostdeck_core::push::StatusPayload;
use hostdeck_core::types::{TempPoint, TemperatureSeries};

use crate::handler::Task;

use super::{PushConsumer, UpdateCx};

/// Points retained per plotted series. At the host's one-sample-per-second
/// cadence this is a five minute window, the same window the host replays
/// on connect.
const SERIES_CAP: usize = 300;

/// Which target input currently has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TempTarget {
    #[default]
    Hotend,
    Bed,
}

/// View-model for the temperature panel.
///
/// Readouts track the newest sample of each live frame; the series cache
/// feeds the plot. History frames replace the series wholesale but leave the
/// readouts alone, so a reconnect never flashes stale numbers.
#[derive(Debug, Default)]
pub struct TemperatureVm {
    /// Plotted series, capped to [`SERIES_CAP`] points each.
    pub series: TemperatureSeries,
    /// Latest readouts in °C. `0.0` means "no reading" and renders as a dash.
    pub actual_temp: f64,
    pub target_temp: f64,
    pub bed_temp: f64,
    pub bed_target_temp: f64,
    /// Target entry fields, in whole degrees.
    pub hotend_input: u32,
    pub bed_input: u32,
    pub focus: TempTarget,
}

impl TemperatureVm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temp_string(&self) -> String {
        format_temp(self.actual_temp)
    }

    pub fn target_string(&self) -> String {
        format_temp(self.target_temp)
    }

    pub fn bed_temp_string(&self) -> String {
        format_temp(self.bed_temp)
    }

    pub fn bed_target_string(&self) -> String {
        format_temp(self.bed_target_temp)
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            TempTarget::Hotend => TempTarget::Bed,
            TempTarget::Bed => TempTarget::Hotend,
        };
    }

    /// Nudge the focused target input, clamping at zero.
    pub fn adjust_focused(&mut self, delta: i32) {
        let input = match self.focus {
            TempTarget::Hotend => &mut self.hotend_input,
            TempTarget::Bed => &mut self.bed_input,
        };
        *input = input.saturating_add_signed(delta);
    }

    /// The set-temperature request for the focused input.
    pub fn send_task(&self) -> Task {
        match self.focus {
            TempTarget::Hotend => {
                let celsius = f64::from(self.hotend_input);
                Task::SetHotendTemperature { celsius }
            }
            TempTarget::Bed => {
                let celsius = f64::from(self.bed_input);
                Task::SetBedTemperature { celsius }
            }
        }
    }
}

impl PushConsumer for TemperatureVm {
    fn apply_live_update(&mut self, payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {
        let samples = &payload.temperatures;
        let Some(last) = samples.last() else {
            return;
        };

        self.actual_temp = last.temp;
        self.target_temp = last.target_temp;
        self.bed_temp = last.bed_temp;
        self.bed_target_temp = last.target_bed_temp;

        for sample in samples {
            let at = sample.current_time;
            self.series.actual.push((at, sample.temp));
            self.series.target.push((at, sample.target_temp));
            self.series.actual_bed.push((at, sample.bed_temp));
            self.series.target_bed.push((at, sample.target_bed_temp));
        }
        cap_series(&mut self.series);
    }

    fn apply_snapshot_replay(&mut self, payload: &StatusPayload, _cx: &mut UpdateCx<'_>) {
        if let Some(history) = &payload.temperature_history {
            self.series = history.clone();
            cap_series(&mut self.series);
        }
    }
}

fn cap_series(series: &mut TemperatureSeries) {
    cap(&mut series.actual);
    cap(&mut series.target);
    cap(&mut series.actual_bed);
    cap(&mut series.target_bed);
}

fn cap(points: &mut Vec<TempPoint>) {
    if points.len() > SERIES_CAP {
        points.drain(..points.len() - SERIES_CAP);
    }
}

fn format_temp(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format!("{value} °C")
    }
}

/// Time axis tick label: minutes before `now_ms`, as the plot draws them.
///
/// The zero timestamp (nothing plotted yet) renders as an empty label.
pub fn axis_label(ts_ms: i64, now_ms: i64) -> String {
    if ts_ms == 0 {
        return String::new();
    }
    let minutes = ((now_ms - ts_ms) as f64 / 60_000.0).round() as i64;
    if minutes == 0 {
        "just now".to_string()
    } else {
        format!("- {minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FlagsStore;
    use hostdeck_core::types::TemperatureSample;

    fn sample(at: i64, temp: f64) -> TemperatureSample {
        TemperatureSample {
            current_time: at,
            temp,
            target_temp: 210.0,
            bed_temp: 60.0,
            target_bed_temp: 65.0,
        }
    }

    fn live(vm: &mut TemperatureVm, samples: Vec<TemperatureSample>) {
        let flags = FlagsStore::default();
        let mut cx = UpdateCx::new(&flags);
        vm.apply_live_update(
            &StatusPayload {
                temperatures: samples,
                ..StatusPayload::default()
            },
            &mut cx,
        );
    }

    #[test]
    fn test_readouts_track_newest_sample() {
        let mut vm = TemperatureVm::new();
        live(&mut vm, vec![sample(1_000, 180.0), sample(2_000, 185.5)]);

        assert_eq!(vm.actual_temp, 185.5);
        assert_eq!(vm.target_temp, 210.0);
        assert_eq!(vm.bed_temp, 60.0);
        assert_eq!(vm.bed_target_temp, 65.0);
        assert_eq!(vm.series.actual.len(), 2);
    }

    #[test]
    fn test_empty_batch_changes_nothing() {
        let mut vm = TemperatureVm::new();
        live(&mut vm, vec![sample(1_000, 180.0)]);
        live(&mut vm, vec![]);

        assert_eq!(vm.actual_temp, 180.0);
        assert_eq!(vm.series.actual.len(), 1);
    }

    #[test]
    fn test_series_capped_to_window() {
        let mut vm = TemperatureVm::new();
        let samples: Vec<_> = (0..310).map(|i| sample(i * 1_000, 20.0 + i as f64)).collect();
        live(&mut vm, samples);

        assert_eq!(vm.series.actual.len(), 300);
        assert_eq!(vm.series.target.len(), 300);
        assert_eq!(vm.series.actual_bed.len(), 300);
        assert_eq!(vm.series.target_bed.len(), 300);
        // Oldest ten points fell off the front.
        assert_eq!(vm.series.actual[0].0, 10_000);
    }

    #[test]
    fn test_history_replaces_series_and_keeps_readouts() {
        let mut vm = TemperatureVm::new();
        live(&mut vm, vec![sample(1_000, 180.0)]);

        let history = TemperatureSeries {
            actual: vec![(5_000, 20.0), (6_000, 21.0)],
            target: vec![(5_000, 0.0), (6_000, 0.0)],
            actual_bed: vec![(5_000, 19.0), (6_000, 19.5)],
            target_bed: vec![(5_000, 0.0), (6_000, 0.0)],
        };
        let flags = FlagsStore::default();
        let mut cx = UpdateCx::new(&flags);
        vm.apply_snapshot_replay(
            &StatusPayload {
                temperature_history: Some(history.clone()),
                ..StatusPayload::default()
            },
            &mut cx,
        );

        assert_eq!(vm.series, history);
        assert_eq!(vm.actual_temp, 180.0);
    }

    #[test]
    fn test_history_without_series_is_ignored() {
        let mut vm = TemperatureVm::new();
        live(&mut vm, vec![sample(1_000, 180.0)]);

        let flags = FlagsStore::default();
        let mut cx = UpdateCx::new(&flags);
        vm.apply_snapshot_replay(&StatusPayload::default(), &mut cx);

        assert_eq!(vm.series.actual.len(), 1);
    }

    #[test]
    fn test_temp_string_dashes_when_cold() {
        let vm = TemperatureVm::new();
        assert_eq!(vm.temp_string(), "-");

        let vm = TemperatureVm {
            actual_temp: 21.3,
            ..TemperatureVm::new()
        };
        assert_eq!(vm.temp_string(), "21.3 °C");

        let vm = TemperatureVm {
            actual_temp: 200.0,
            ..TemperatureVm::new()
        };
        assert_eq!(vm.temp_string(), "200 °C");
    }

    #[test]
    fn test_axis_label() {
        let now = 600_000;
        assert_eq!(axis_label(0, now), "");
        assert_eq!(axis_label(600_000, now), "just now");
        assert_eq!(axis_label(590_000, now), "just now");
        assert_eq!(axis_label(300_000, now), "- 5 min");
        // 150 s rounds up to 3 minutes.
        assert_eq!(axis_label(450_000, now), "- 3 min");
    }

    #[test]
    fn test_adjust_focused_clamps_at_zero() {
        let mut vm = TemperatureVm::new();
        vm.adjust_focused(-5);
        assert_eq!(vm.hotend_input, 0);

        vm.adjust_focused(5);
        vm.adjust_focused(5);
        assert_eq!(vm.hotend_input, 10);

        vm.focus_next();
        vm.adjust_focused(60);
        assert_eq!(vm.bed_input, 60);
        assert_eq!(vm.hotend_input, 10);
    }

    #[test]
    fn test_send_task_follows_focus() {
        let mut vm = TemperatureVm::new();
        vm.hotend_input = 210;
        vm.bed_input = 60;

        assert!(matches!(
            vm.send_task(),
            Task::SetHotendTemperature { celsius } if celsius == 210.0
        ));

        vm.focus_next();
        assert!(matches!(
            vm.send_task(),
            Task::SetBedTemperature { celsius } if celsius == 60.0
        ));
    }
}
