use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::aggregate::AggregateResult;
use crate::data::filter::FilterSelection;
use crate::data::join::CountyJoin;
use crate::data::model::Dimension;

// ---------------------------------------------------------------------------
// Summary report (headless output and "Export…")
// ---------------------------------------------------------------------------

/// The aggregate for one selection, with the filters that produced it.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    /// Column name → dropdown text ("All Diseases", "Flu", ...).
    pub filters: BTreeMap<&'static str, String>,
    #[serde(flatten)]
    pub result: &'a AggregateResult,
    /// Counties with cases but no boundary on the map.
    pub unmatched_counties: &'a [String],
}

impl<'a> SummaryReport<'a> {
    pub fn new(
        selection: &FilterSelection,
        result: &'a AggregateResult,
        join: &'a CountyJoin,
    ) -> Self {
        let filters = Dimension::ALL
            .into_iter()
            .map(|dim| (dim.column(), selection.display(dim)))
            .collect();
        SummaryReport {
            filters,
            result,
            unmatched_counties: &join.unmatched_counties,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing summary")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::aggregate;
    use crate::data::model::CaseRecord;

    #[test]
    fn json_carries_filters_and_result() {
        let records = vec![
            CaseRecord::new("Flu", "Alameda", 2020, "M", 1200),
            CaseRecord::new("Flu", "Kern", 2021, "F", 3),
        ];
        let mut sel = FilterSelection::default();
        sel.set(Dimension::Disease, Some("Flu")).unwrap();
        let result = aggregate(&records, &sel);
        let join = CountyJoin {
            unmatched_counties: vec!["Kern".into()],
            ..Default::default()
        };

        let json = SummaryReport::new(&sel, &result, &join).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["filters"]["Disease"], "Flu");
        assert_eq!(value["filters"]["County"], "All Counties");
        assert_eq!(value["total_cases"], 1203);
        assert_eq!(value["first_year"], 2020);
        assert_eq!(value["by_year"][1]["year"], 2021);
        assert_eq!(value["by_county"][0]["county"], "Alameda");
        assert_eq!(value["unmatched_counties"][0], "Kern");
    }

    #[test]
    fn empty_result_has_null_years() {
        let result = AggregateResult::default();
        let join = CountyJoin::default();
        let json = SummaryReport::new(&FilterSelection::default(), &result, &join)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["first_year"].is_null());
        assert!(value["last_year"].is_null());
        assert_eq!(value["total_cases"], 0);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let result = AggregateResult::default();
        let join = CountyJoin::default();
        SummaryReport::new(&FilterSelection::default(), &result, &join)
            .write_json(&path)
            .unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"total_cases\": 0"));
    }
}
