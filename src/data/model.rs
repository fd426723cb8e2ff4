use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CaseRecord – one row of the surveillance table
// ---------------------------------------------------------------------------

/// A single row of the source table: case count for one
/// disease / county / year / sex combination.
///
/// Rows are not unique on the four keys; duplicates are summed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaseRecord {
    #[serde(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Cases")]
    pub cases: u64,
}

impl CaseRecord {
    pub fn new(disease: &str, county: &str, year: i32, sex: &str, cases: u64) -> Self {
        Self {
            disease: disease.to_string(),
            county: county.to_string(),
            year,
            sex: sex.to_string(),
            cases,
        }
    }
}

/// Column names every case table must carry, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Disease", "County", "Year", "Sex", "Cases"];

// ---------------------------------------------------------------------------
// Dimension – the four filterable columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Disease,
    County,
    Year,
    Sex,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Disease,
        Dimension::County,
        Dimension::Year,
        Dimension::Sex,
    ];

    /// Column header in the source table.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Disease => "Disease",
            Dimension::County => "County",
            Dimension::Year => "Year",
            Dimension::Sex => "Sex",
        }
    }

    /// Label shown in a dropdown for the "match anything" entry.
    pub fn wildcard_label(self) -> &'static str {
        match self {
            Dimension::Disease => "All Diseases",
            Dimension::County => "All Counties",
            Dimension::Year => "All Years",
            Dimension::Sex => "All",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Vocabulary – distinct values per dimension
// ---------------------------------------------------------------------------

/// Sorted distinct values for each filterable column.
///
/// These are the only concrete values a filter may hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    pub diseases: BTreeSet<String>,
    pub counties: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub sexes: BTreeSet<String>,
}

impl Vocabulary {
    pub fn from_records(records: &[CaseRecord]) -> Self {
        let mut vocab = Vocabulary::default();
        for rec in records {
            vocab.diseases.insert(rec.disease.clone());
            vocab.counties.insert(rec.county.clone());
            vocab.years.insert(rec.year);
            vocab.sexes.insert(rec.sex.clone());
        }
        vocab
    }

    /// Display strings for a dropdown: the wildcard label first, then every
    /// distinct value in sorted order.
    pub fn options(&self, dim: Dimension) -> Vec<String> {
        let values: Vec<String> = match dim {
            Dimension::Disease => self.diseases.iter().cloned().collect(),
            Dimension::County => self.counties.iter().cloned().collect(),
            Dimension::Year => self.years.iter().map(|y| y.to_string()).collect(),
            Dimension::Sex => self.sexes.iter().cloned().collect(),
        };
        std::iter::once(dim.wildcard_label().to_string())
            .chain(values)
            .collect()
    }

    /// Whether `value` (in display form) is a known value of `dim`.
    pub fn contains(&self, dim: Dimension, value: &str) -> bool {
        match dim {
            Dimension::Disease => self.diseases.contains(value),
            Dimension::County => self.counties.contains(value),
            Dimension::Year => value
                .parse::<i32>()
                .is_ok_and(|y| self.years.contains(&y)),
            Dimension::Sex => self.sexes.contains(value),
        }
    }
}

// ---------------------------------------------------------------------------
// CaseDataset – the loaded table plus its vocabulary
// ---------------------------------------------------------------------------

/// The full case table, read-only after load.
#[derive(Debug, Clone)]
pub struct CaseDataset {
    pub records: Vec<CaseRecord>,
    pub vocabulary: Vocabulary,
}

impl CaseDataset {
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        let vocabulary = Vocabulary::from_records(&records);
        CaseDataset {
            records,
            vocabulary,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CaseDataset {
        CaseDataset::from_records(vec![
            CaseRecord::new("Measles", "Kern", 2021, "M", 2),
            CaseRecord::new("Flu", "Alameda", 2020, "M", 5),
            CaseRecord::new("Flu", "Alameda", 2009, "F", 3),
        ])
    }

    #[test]
    fn options_start_with_wildcard_and_are_sorted() {
        let ds = sample();
        assert_eq!(
            ds.vocabulary.options(Dimension::Disease),
            vec!["All Diseases", "Flu", "Measles"]
        );
        assert_eq!(
            ds.vocabulary.options(Dimension::Year),
            vec!["All Years", "2009", "2020", "2021"]
        );
        assert_eq!(ds.vocabulary.options(Dimension::Sex), vec!["All", "F", "M"]);
    }

    #[test]
    fn years_sort_numerically() {
        let ds = CaseDataset::from_records(vec![
            CaseRecord::new("Flu", "Kern", 10000, "M", 1),
            CaseRecord::new("Flu", "Kern", 999, "M", 1),
        ]);
        assert_eq!(
            ds.vocabulary.options(Dimension::Year),
            vec!["All Years", "999", "10000"]
        );
    }

    #[test]
    fn contains_checks_each_dimension() {
        let vocab = sample().vocabulary;
        assert!(vocab.contains(Dimension::County, "Kern"));
        assert!(!vocab.contains(Dimension::County, "kern"));
        assert!(vocab.contains(Dimension::Year, "2020"));
        assert!(!vocab.contains(Dimension::Year, "twenty"));
        assert!(!vocab.contains(Dimension::Disease, "All Diseases"));
    }
}
