use std::path::PathBuf;

use crate::data::aggregate::{aggregate, AggregateResult};
use crate::data::boundary::CountyBoundaries;
use crate::data::filter::FilterSelection;
use crate::data::join::{join_counties, CountyJoin};
use crate::data::loader::LoadedData;
use crate::data::model::{CaseDataset, Dimension};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Case table (read-only between reloads).
    pub dataset: CaseDataset,

    /// County polygons for the map.
    pub boundaries: CountyBoundaries,

    /// Where the current inputs came from, shown in the top bar.
    pub cases_path: PathBuf,
    pub boundaries_path: PathBuf,

    /// Current value of the four filter dropdowns.
    pub selection: FilterSelection,

    /// Aggregate for `selection` (recomputed on every change).
    pub result: AggregateResult,

    /// `result.by_county` joined to `boundaries`.
    pub join: CountyJoin,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(data: LoadedData, cases_path: PathBuf, boundaries_path: PathBuf) -> Self {
        let mut state = Self {
            dataset: data.dataset,
            boundaries: data.boundaries,
            cases_path,
            boundaries_path,
            selection: FilterSelection::default(),
            result: AggregateResult::default(),
            join: CountyJoin::default(),
            status_message: None,
        };
        state.refresh();
        state
    }

    /// Recompute the aggregate and the map join for the current selection.
    pub fn refresh(&mut self) {
        self.result = aggregate(&self.dataset.records, &self.selection);
        self.join = join_counties(&self.result.by_county, &self.boundaries);
        log::debug!(
            "Selection {:?}: {} cases over {} years, {} counties shaded",
            self.selection,
            self.result.total_cases,
            self.result.by_year.len(),
            self.join.shaded.len()
        );
    }

    /// Apply a dropdown change. `None` selects the wildcard.
    pub fn set_filter(&mut self, dim: Dimension, value: Option<&str>) {
        match self.selection.set(dim, value) {
            Ok(()) => {
                self.status_message = None;
                self.refresh();
            }
            Err(e) => {
                log::warn!("Ignoring filter change: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// "Clear Filters": every dropdown back to its wildcard.
    pub fn clear_filters(&mut self) {
        if !self.selection.is_cleared() {
            self.selection.clear();
            self.refresh();
        }
    }

    /// Swap in a new case table. The old selection may name values the new
    /// table lacks, so filters are cleared.
    pub fn replace_dataset(&mut self, dataset: CaseDataset, path: PathBuf) {
        self.dataset = dataset;
        self.cases_path = path;
        self.selection.clear();
        self.status_message = None;
        self.refresh();
    }

    pub fn replace_boundaries(&mut self, boundaries: CountyBoundaries, path: PathBuf) {
        self.boundaries = boundaries;
        self.boundaries_path = path;
        self.status_message = None;
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::data::filter::Filter;
    use crate::data::model::CaseRecord;

    fn boundaries() -> CountyBoundaries {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NAME":"Alameda"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type":"Feature","properties":{"NAME":"Kern"},
             "geometry":{"type":"Polygon","coordinates":[[[1,0],[2,0],[2,1],[1,1],[1,0]]]}}]}"#;
        CountyBoundaries::parse(text, Path::new("t.geojson")).unwrap()
    }

    fn state() -> AppState {
        let dataset = CaseDataset::from_records(vec![
            CaseRecord::new("Flu", "Alameda", 2020, "M", 5),
            CaseRecord::new("Flu", "Alameda", 2021, "F", 3),
            CaseRecord::new("Measles", "Kern", 2020, "M", 2),
        ]);
        AppState::new(
            LoadedData {
                dataset,
                boundaries: boundaries(),
            },
            PathBuf::from("cases.csv"),
            PathBuf::from("t.geojson"),
        )
    }

    #[test]
    fn starts_with_everything_selected() {
        let s = state();
        assert_eq!(s.result.total_cases, 10);
        assert_eq!(s.join.cases_for(0), Some(8));
        assert_eq!(s.join.cases_for(1), Some(2));
    }

    #[test]
    fn filter_change_recomputes() {
        let mut s = state();
        s.set_filter(Dimension::Disease, Some("Measles"));
        assert_eq!(s.result.total_cases, 2);
        assert_eq!(s.join.cases_for(0), None);
        assert_eq!(s.join.boundaries_without_data, vec!["Alameda"]);

        s.set_filter(Dimension::County, Some("Alameda"));
        assert!(s.result.is_empty());
        assert!(s.join.shaded.is_empty());
    }

    #[test]
    fn clear_filters_resets_selection_and_result() {
        let mut s = state();
        s.set_filter(Dimension::Year, Some("2021"));
        s.set_filter(Dimension::Sex, Some("F"));
        assert_eq!(s.result.total_cases, 3);

        s.clear_filters();
        assert_eq!(s.selection, FilterSelection::default());
        assert_eq!(s.result.total_cases, 10);
    }

    #[test]
    fn bad_year_keeps_previous_selection() {
        let mut s = state();
        s.set_filter(Dimension::Year, Some("2020"));
        s.set_filter(Dimension::Year, Some("later"));
        assert_eq!(s.selection.year, Filter::Only(2020));
        assert!(s.status_message.is_some());
    }

    #[test]
    fn replacing_dataset_clears_filters() {
        let mut s = state();
        s.set_filter(Dimension::Disease, Some("Flu"));
        s.replace_dataset(
            CaseDataset::from_records(vec![CaseRecord::new("Mumps", "Kern", 2022, "F", 7)]),
            PathBuf::from("other.csv"),
        );
        assert!(s.selection.is_cleared());
        assert_eq!(s.result.total_cases, 7);
        assert_eq!(s.result.first_year, Some(2022));
    }
}
