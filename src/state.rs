use std::path::Path;

use chrono::NaiveDate;

use crate::data::filter::{resolve_range, DateRange, FilteredView};
use crate::data::loader::load_file;
use crate::data::metrics::{compute, patterns, Metrics, Patterns};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The loaded dataset together with everything derived from it.
pub struct Loaded {
    pub dataset: Dataset,

    /// Whole-dataset averages, built once per load.
    pub patterns: Patterns,

    /// Active interval and the records inside it.
    pub view: FilteredView,

    /// Aggregates over `view`.
    pub metrics: Metrics,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub loaded: Option<Loaded>,

    /// Dates currently shown in the pickers. May be reversed while the user edits.
    pub picker_start: Option<NaiveDate>,
    pub picker_end: Option<NaiveDate>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and show its full date range.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let range = DateRange::full(&dataset);
        let patterns = patterns(&dataset);
        let (view, metrics) = compute(&dataset, range);

        self.picker_start = Some(range.start());
        self.picker_end = Some(range.end());
        self.loaded = Some(Loaded {
            dataset,
            patterns,
            view,
            metrics,
        });
        self.status_message = None;
    }

    /// The interval the displayed metrics were computed for.
    pub fn active_range(&self) -> Option<DateRange> {
        self.loaded.as_ref().map(|l| l.view.range)
    }

    /// Select a new date interval and refresh the metrics.
    ///
    /// Partial or reversed input falls back to the full span. Nothing is
    /// recomputed when the resolved interval is unchanged. Returns whether
    /// the metrics were recomputed.
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        self.picker_start = start;
        self.picker_end = end;

        let Some(loaded) = self.loaded.as_mut() else {
            return false;
        };
        let range = resolve_range(&loaded.dataset, start, end);
        if range == loaded.view.range {
            return false;
        }

        let (view, metrics) = compute(&loaded.dataset, range);
        loaded.view = view;
        loaded.metrics = metrics;
        true
    }

    /// Go back to the dataset's full date span.
    pub fn reset_date_range(&mut self) {
        if let Some(range) = self.loaded.as_ref().map(|l| DateRange::full(&l.dataset)) {
            self.set_date_range(Some(range.start()), Some(range.end()));
        }
    }

    /// Load a file, replacing the current dataset on success.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records from {} spanning {} to {}",
                    dataset.len(),
                    path.display(),
                    dataset.min_date(),
                    dataset.max_date()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.set_load_error(format!("Error: {e:#}"));
            }
        }
    }

    /// Record a failed load. Any previously loaded dataset stays.
    pub fn set_load_error(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{day, record};
    use crate::data::model::{Weather, WorkingDay};

    fn loaded_state() -> AppState {
        let mut rows = vec![
            record(day(1), 0, 5, 1),
            record(day(2), 0, 10, 1),
            record(day(3), 0, 15, 1),
        ];
        rows[0].working_day = WorkingDay::NonWorking;
        rows[2].weather = Weather::Mist;

        let mut state = AppState::default();
        state.set_dataset(Dataset::new(rows).unwrap());
        state
    }

    #[test]
    fn new_dataset_shows_full_range() {
        let state = loaded_state();
        let range = state.active_range().unwrap();
        assert_eq!((range.start(), range.end()), (day(1), day(3)));
        assert_eq!(state.picker_start, Some(day(1)));
        assert_eq!(state.picker_end, Some(day(3)));
        assert_eq!(state.loaded.as_ref().unwrap().metrics.total_casual, 30);
    }

    #[test]
    fn narrowing_the_range_recomputes_once() {
        let mut state = loaded_state();
        assert!(state.set_date_range(Some(day(1)), Some(day(2))));
        assert_eq!(state.loaded.as_ref().unwrap().metrics.total_casual, 15);
        assert!(!state.set_date_range(Some(day(1)), Some(day(2))));
    }

    #[test]
    fn reversed_selection_keeps_pickers_but_uses_full_range() {
        let mut state = loaded_state();
        state.set_date_range(Some(day(2)), Some(day(2)));
        state.set_date_range(Some(day(3)), Some(day(1)));

        assert_eq!(state.picker_start, Some(day(3)));
        assert_eq!(state.picker_end, Some(day(1)));
        let range = state.active_range().unwrap();
        assert!(range.start() <= range.end());
        assert_eq!((range.start(), range.end()), (day(1), day(3)));
    }

    #[test]
    fn patterns_ignore_the_selected_range() {
        let mut state = loaded_state();
        let before = state.loaded.as_ref().unwrap().patterns.clone();
        for (s, e) in [(1, 1), (2, 3), (10, 12)] {
            state.set_date_range(Some(day(s)), Some(day(e)));
            assert_eq!(state.loaded.as_ref().unwrap().patterns, before);
        }
    }

    #[test]
    fn range_outside_data_is_empty_not_an_error() {
        let mut state = loaded_state();
        state.set_date_range(Some(day(20)), Some(day(25)));
        let loaded = state.loaded.as_ref().unwrap();
        assert!(loaded.view.is_empty());
        assert_eq!(loaded.metrics.total_casual, 0);
        assert!(loaded.metrics.average_temp_c.is_nan());
    }

    #[test]
    fn reset_and_load_error() {
        let mut state = loaded_state();
        state.set_date_range(Some(day(2)), Some(day(2)));
        state.reset_date_range();
        assert_eq!(state.loaded.as_ref().unwrap().view.len(), 3);

        state.set_load_error("Error: boom".into());
        assert!(state.loaded.is_some());
        assert_eq!(state.status_message.as_deref(), Some("Error: boom"));
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let mut state = loaded_state();
        state.open(Path::new("does-not-exist.csv"));
        assert_eq!(state.loaded.as_ref().unwrap().dataset.len(), 3);
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error:"), "{msg}");
        assert!(msg.contains("does-not-exist.csv"), "{msg}");
    }

    #[test]
    fn empty_state_ignores_range_changes() {
        let mut state = AppState::default();
        assert!(!state.set_date_range(Some(day(1)), Some(day(2))));
        assert!(state.active_range().is_none());
    }
}
