use std::collections::{BTreeMap, BTreeSet};

use super::aggregate::CountyTotal;
use super::boundary::CountyBoundaries;

/// Title-case a county name for matching against boundary names:
/// a letter is upper-cased when the character before it is not a letter,
/// otherwise lower-cased. `"SAN LUIS OBISPO"` becomes `"San Luis Obispo"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Outcome of joining per-county totals to boundary features.
///
/// A county present on only one side is not an error: it just does not get
/// shaded on the map. Both kinds of mismatch are listed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountyJoin {
    /// Boundary feature index → case total for that county.
    pub shaded: BTreeMap<usize, u64>,
    /// Title-cased counties from the case data with no boundary feature,
    /// each listed once.
    pub unmatched_counties: Vec<String>,
    /// Boundary feature names with no row in the aggregate.
    pub boundaries_without_data: Vec<String>,
}

impl CountyJoin {
    pub fn cases_for(&self, feature_index: usize) -> Option<u64> {
        self.shaded.get(&feature_index).copied()
    }
}

/// Match `by_county` (title-cased) to feature names by exact equality.
pub fn join_counties(by_county: &[CountyTotal], boundaries: &CountyBoundaries) -> CountyJoin {
    let mut index_by_name: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, f) in boundaries.features.iter().enumerate() {
        index_by_name.entry(f.name.as_str()).or_default().push(i);
    }

    let mut join = CountyJoin::default();
    let mut matched_names: BTreeSet<&str> = BTreeSet::new();

    for total in by_county {
        let display = title_case(&total.county);
        match index_by_name.get_key_value(display.as_str()) {
            Some((name, indices)) => {
                matched_names.insert(*name);
                // Titles can collapse two raw spellings onto one feature.
                for &i in indices {
                    *join.shaded.entry(i).or_default() += total.cases;
                }
            }
            None => {
                if !join.unmatched_counties.contains(&display) {
                    join.unmatched_counties.push(display);
                }
            }
        }
    }

    join.boundaries_without_data = index_by_name
        .keys()
        .filter(|name| !matched_names.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if !join.unmatched_counties.is_empty() {
        log::debug!(
            "Counties without a boundary feature: {:?}",
            join.unmatched_counties
        );
    }

    join
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn title_case_word_boundaries() {
        assert_eq!(title_case("SAN LUIS OBISPO"), "San Luis Obispo");
        assert_eq!(title_case("alameda"), "Alameda");
        assert_eq!(title_case("contra costa"), "Contra Costa");
        assert_eq!(title_case("o'brien-x"), "O'Brien-X");
        assert_eq!(title_case(""), "");
    }

    fn boundaries(names: &[&str]) -> CountyBoundaries {
        let features: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                format!(
                    r#"{{"type":"Feature","properties":{{"NAME":"{n}"}},
                       "geometry":{{"type":"Polygon","coordinates":[[[{i},0],[{j},0],[{j},1],[{i},1],[{i},0]]]}}}}"#,
                    j = i + 1
                )
            })
            .collect();
        let text = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );
        CountyBoundaries::parse(&text, Path::new("test.geojson")).unwrap()
    }

    fn total(county: &str, cases: u64) -> CountyTotal {
        CountyTotal {
            county: county.to_string(),
            cases,
        }
    }

    #[test]
    fn matches_after_title_casing() {
        let b = boundaries(&["Alameda", "Kern", "San Mateo"]);
        let join = join_counties(&[total("ALAMEDA", 4), total("san mateo", 6)], &b);

        assert_eq!(join.cases_for(0), Some(4));
        assert_eq!(join.cases_for(1), None);
        assert_eq!(join.cases_for(2), Some(6));
        assert!(join.unmatched_counties.is_empty());
        assert_eq!(join.boundaries_without_data, vec!["Kern"]);
    }

    #[test]
    fn mismatches_are_reported_not_fatal() {
        let b = boundaries(&["Alameda"]);
        let join = join_counties(&[total("Alameda", 1), total("California", 99)], &b);

        assert_eq!(join.shaded.len(), 1);
        assert_eq!(join.unmatched_counties, vec!["California"]);
        assert!(join.boundaries_without_data.is_empty());
    }

    #[test]
    fn spellings_that_title_case_alike_are_summed() {
        let b = boundaries(&["Kern"]);
        let join = join_counties(&[total("KERN", 2), total("Kern", 3)], &b);
        assert_eq!(join.cases_for(0), Some(5));
    }

    #[test]
    fn unmatched_spellings_are_listed_once() {
        let b = boundaries(&["Alameda"]);
        let join = join_counties(&[total("KERN", 2), total("Kern", 3), total("kern", 1)], &b);
        assert_eq!(join.unmatched_counties, vec!["Kern"]);
    }

    #[test]
    fn empty_aggregate_leaves_every_boundary_blank() {
        let b = boundaries(&["Alameda", "Kern"]);
        let join = join_counties(&[], &b);
        assert!(join.shaded.is_empty());
        assert_eq!(join.boundaries_without_data, vec!["Alameda", "Kern"]);
    }
}
