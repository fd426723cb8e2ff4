use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilterSelection;
use super::model::CaseRecord;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub cases: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountyTotal {
    pub county: String,
    pub cases: u64,
}

/// Everything the dashboard draws for one filter selection.
///
/// `first_year`/`last_year` are `None` exactly when no row matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateResult {
    pub total_cases: u64,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    /// Ascending by year, one entry per year.
    pub by_year: Vec<YearTotal>,
    /// Alphabetical by county, one entry per county.
    pub by_county: Vec<CountyTotal>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter `records` by `selection`, then group-and-sum by year and county.
///
/// Pure: no I/O, `records` untouched, same input gives the same output.
/// A concrete value that never occurs in the data simply matches nothing.
pub fn aggregate(records: &[CaseRecord], selection: &FilterSelection) -> AggregateResult {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    let mut by_county: BTreeMap<&str, u64> = BTreeMap::new();
    let mut total_cases = 0u64;

    for rec in records.iter().filter(|r| selection.matches(r)) {
        total_cases += rec.cases;
        *by_year.entry(rec.year).or_default() += rec.cases;
        *by_county.entry(rec.county.as_str()).or_default() += rec.cases;
    }

    // BTreeMap keys are sorted, so the extremes are the first and last keys.
    let first_year = by_year.keys().next().copied();
    let last_year = by_year.keys().next_back().copied();

    AggregateResult {
        total_cases,
        first_year,
        last_year,
        by_year: by_year
            .into_iter()
            .map(|(year, cases)| YearTotal { year, cases })
            .collect(),
        by_county: by_county
            .into_iter()
            .map(|(county, cases)| CountyTotal {
                county: county.to_string(),
                cases,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Metric card text
// ---------------------------------------------------------------------------

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.first_year.is_none()
    }

    /// Total with thousands separators, e.g. `1,234,567`.
    pub fn total_label(&self) -> String {
        group_thousands(self.total_cases)
    }

    pub fn first_year_label(&self) -> String {
        year_label(self.first_year)
    }

    pub fn last_year_label(&self) -> String {
        year_label(self.last_year)
    }

    /// Largest single-county total, used to scale the map colours.
    pub fn max_county_cases(&self) -> u64 {
        self.by_county.iter().map(|c| c.cases).max().unwrap_or(0)
    }
}

fn year_label(year: Option<i32>) -> String {
    year.map_or_else(|| "N/A".to_string(), |y| y.to_string())
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Filter;

    fn records() -> Vec<CaseRecord> {
        vec![
            CaseRecord::new("Flu", "Alameda", 2020, "M", 5),
            CaseRecord::new("Flu", "Alameda", 2021, "F", 3),
            CaseRecord::new("Measles", "Kern", 2020, "M", 2),
        ]
    }

    fn only(s: &str) -> Filter<String> {
        Filter::Only(s.to_string())
    }

    #[test]
    fn flu_example() {
        let sel = FilterSelection {
            disease: only("Flu"),
            ..Default::default()
        };
        let res = aggregate(&records(), &sel);
        assert_eq!(res.total_cases, 8);
        assert_eq!(res.first_year, Some(2020));
        assert_eq!(res.last_year, Some(2021));
        assert_eq!(
            res.by_year,
            vec![
                YearTotal { year: 2020, cases: 5 },
                YearTotal { year: 2021, cases: 3 },
            ]
        );
        assert_eq!(
            res.by_county,
            vec![CountyTotal {
                county: "Alameda".into(),
                cases: 8
            }]
        );
    }

    #[test]
    fn no_matching_rows_gives_empty_result() {
        let sel = FilterSelection {
            disease: only("Measles"),
            county: only("Alameda"),
            ..Default::default()
        };
        let res = aggregate(&records(), &sel);
        assert_eq!(res, AggregateResult::default());
        assert!(res.is_empty());
        assert_eq!(res.first_year_label(), "N/A");
        assert_eq!(res.total_label(), "0");
    }

    #[test]
    fn unknown_value_matches_nothing() {
        let sel = FilterSelection {
            county: only("Atlantis"),
            ..Default::default()
        };
        assert_eq!(aggregate(&records(), &sel), AggregateResult::default());
    }

    #[test]
    fn wildcards_sum_whole_dataset() {
        let recs = records();
        let res = aggregate(&recs, &FilterSelection::default());
        assert_eq!(res.total_cases, recs.iter().map(|r| r.cases).sum::<u64>());
        assert_eq!(res.by_year.iter().map(|y| y.cases).sum::<u64>(), 10);
        assert_eq!(res.by_county.iter().map(|c| c.cases).sum::<u64>(), 10);
        assert_eq!(res.by_year[0], YearTotal { year: 2020, cases: 7 });
        assert_eq!(res.by_county[1].county, "Kern");
    }

    #[test]
    fn duplicate_rows_are_summed() {
        let mut recs = records();
        recs.push(CaseRecord::new("Flu", "Alameda", 2020, "M", 4));
        let sel = FilterSelection {
            year: Filter::Only(2020),
            sex: only("M"),
            ..Default::default()
        };
        let res = aggregate(&recs, &sel);
        assert_eq!(res.total_cases, 11);
        assert_eq!(res.by_year, vec![YearTotal { year: 2020, cases: 11 }]);
        assert_eq!(res.by_county.len(), 2);
        assert_eq!(res.first_year, res.last_year);
    }

    #[test]
    fn totals_are_consistent_for_every_selection() {
        let mut recs = records();
        recs.extend([
            CaseRecord::new("Flu", "Kern", 2019, "F", 7),
            CaseRecord::new("Pertussis", "Yolo", 2022, "F", 0),
            CaseRecord::new("Measles", "Yolo", 2019, "M", 1),
        ]);
        let vocab = crate::data::model::Vocabulary::from_records(&recs);

        let any_or = |vals: Vec<String>| {
            let mut v: Vec<Filter<String>> = vals.into_iter().map(Filter::Only).collect();
            v.push(Filter::Any);
            v
        };
        let diseases = any_or(vocab.diseases.iter().cloned().collect());
        let counties = any_or(vocab.counties.iter().cloned().collect());
        let sexes = any_or(vocab.sexes.iter().cloned().collect());
        let mut years: Vec<Filter<i32>> = vocab.years.iter().copied().map(Filter::Only).collect();
        years.push(Filter::Any);

        for d in &diseases {
            for c in &counties {
                for y in &years {
                    for s in &sexes {
                        let sel = FilterSelection {
                            disease: d.clone(),
                            county: c.clone(),
                            year: y.clone(),
                            sex: s.clone(),
                        };
                        let res = aggregate(&recs, &sel);
                        let expected: u64 =
                            recs.iter().filter(|r| sel.matches(r)).map(|r| r.cases).sum();
                        assert_eq!(res.total_cases, expected);
                        assert_eq!(res.by_year.iter().map(|y| y.cases).sum::<u64>(), expected);
                        assert_eq!(res.by_county.iter().map(|c| c.cases).sum::<u64>(), expected);
                        assert!(res.by_year.windows(2).all(|w| w[0].year < w[1].year));
                        assert!(res.by_county.windows(2).all(|w| w[0].county < w[1].county));
                        match (res.first_year, res.last_year) {
                            (Some(lo), Some(hi)) => {
                                assert!(lo <= hi);
                                assert!(recs.iter().any(|r| sel.matches(r) && r.year == lo));
                                assert!(recs.iter().any(|r| sel.matches(r) && r.year == hi));
                            }
                            (None, None) => {
                                assert_eq!(res.total_cases, 0);
                                assert!(res.by_year.is_empty() && res.by_county.is_empty());
                            }
                            other => panic!("inconsistent year range {other:?}"),
                        }
                        assert_eq!(res, aggregate(&recs, &sel));
                    }
                }
            }
        }
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
