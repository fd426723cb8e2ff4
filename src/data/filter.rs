use super::error::SelectionError;
use super::model::{CaseRecord, Dimension, Vocabulary};

// ---------------------------------------------------------------------------
// Filter – wildcard or a single concrete value
// ---------------------------------------------------------------------------

/// One filter field. `Any` applies no predicate; it is a tag, not a magic
/// string, so a disease literally named "All Diseases" still filters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    Any,
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Filter::Any => true,
            Filter::Only(want) => want == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Filter::Any)
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – the four dropdowns
// ---------------------------------------------------------------------------

/// Current value of every filter control. The default is all wildcards,
/// which is also what "Clear Filters" restores.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub disease: Filter<String>,
    pub county: Filter<String>,
    pub year: Filter<i32>,
    pub sex: Filter<String>,
}

impl FilterSelection {
    /// Reset every field to its wildcard.
    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }

    /// Whether a record passes every non-wildcard field.
    pub fn matches(&self, rec: &CaseRecord) -> bool {
        self.disease.accepts(&rec.disease)
            && self.county.accepts(&rec.county)
            && self.year.accepts(&rec.year)
            && self.sex.accepts(&rec.sex)
    }

    pub fn is_cleared(&self) -> bool {
        self.disease.is_any() && self.county.is_any() && self.year.is_any() && self.sex.is_any()
    }

    /// Dropdown string currently selected for `dim`.
    pub fn display(&self, dim: Dimension) -> String {
        fn show<T: ToString>(f: &Filter<T>, dim: Dimension) -> String {
            match f {
                Filter::Any => dim.wildcard_label().to_string(),
                Filter::Only(v) => v.to_string(),
            }
        }
        match dim {
            Dimension::Disease => show(&self.disease, dim),
            Dimension::County => show(&self.county, dim),
            Dimension::Year => show(&self.year, dim),
            Dimension::Sex => show(&self.sex, dim),
        }
    }

    /// Apply a dropdown choice. `None` is the wildcard entry; any other
    /// value is taken as concrete, so the entry list must come from
    /// [`Vocabulary::options`] with the wildcard mapped to `None`.
    pub fn set(&mut self, dim: Dimension, value: Option<&str>) -> Result<(), SelectionError> {
        match dim {
            Dimension::Disease => self.disease = concrete(value),
            Dimension::County => self.county = concrete(value),
            Dimension::Sex => self.sex = concrete(value),
            Dimension::Year => {
                self.year = match value {
                    None => Filter::Any,
                    Some(s) => Filter::Only(
                        s.trim()
                            .parse()
                            .map_err(|_| SelectionError::BadYear(s.to_string()))?,
                    ),
                }
            }
        }
        Ok(())
    }
}

fn concrete(value: Option<&str>) -> Filter<String> {
    value.map_or(Filter::Any, |v| Filter::Only(v.to_string()))
}

// ---------------------------------------------------------------------------
// Validation against the vocabulary
// ---------------------------------------------------------------------------

impl Vocabulary {
    /// Reject a selection holding a concrete value the dataset never uses.
    ///
    /// The aggregation itself never calls this; an unknown value there just
    /// matches no rows.
    pub fn validate(&self, selection: &FilterSelection) -> Result<(), SelectionError> {
        for dim in Dimension::ALL {
            let is_any = match dim {
                Dimension::Disease => selection.disease.is_any(),
                Dimension::County => selection.county.is_any(),
                Dimension::Year => selection.year.is_any(),
                Dimension::Sex => selection.sex.is_any(),
            };
            if is_any {
                continue;
            }
            let value = selection.display(dim);
            if !self.contains(dim, &value) {
                return Err(SelectionError::OutOfVocabulary {
                    dimension: dim,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec() -> CaseRecord {
        CaseRecord::new("Flu", "Alameda", 2020, "M", 5)
    }

    #[test]
    fn default_selection_matches_everything() {
        let sel = FilterSelection::default();
        assert!(sel.is_cleared());
        assert!(sel.matches(&rec()));
    }

    #[test]
    fn each_field_filters_independently() {
        let mut sel = FilterSelection::default();
        sel.year = Filter::Only(2021);
        assert!(!sel.matches(&rec()));

        sel.year = Filter::Only(2020);
        sel.sex = Filter::Only("F".into());
        assert!(!sel.matches(&rec()));

        sel.sex = Filter::Only("M".into());
        sel.county = Filter::Only("alameda".into());
        assert!(!sel.matches(&rec()), "string comparison is exact");
    }

    #[test]
    fn wildcard_label_as_value_is_concrete() {
        let mut sel = FilterSelection::default();
        sel.set(Dimension::Disease, Some("All Diseases")).unwrap();
        assert_eq!(sel.disease, Filter::Only("All Diseases".to_string()));
        assert!(!sel.matches(&rec()));
        assert!(sel.matches(&CaseRecord::new("All Diseases", "Kern", 2020, "M", 1)));
    }

    #[test]
    fn clear_restores_defaults() {
        let mut sel = FilterSelection::default();
        sel.set(Dimension::County, Some("Kern")).unwrap();
        sel.set(Dimension::Year, Some("2019")).unwrap();
        assert_eq!(sel.display(Dimension::Year), "2019");

        sel.clear();
        assert_eq!(sel, FilterSelection::default());
        assert_eq!(sel.display(Dimension::County), "All Counties");
        assert_eq!(sel.display(Dimension::Sex), "All");
    }

    #[test]
    fn bad_year_is_rejected() {
        let mut sel = FilterSelection::default();
        assert_eq!(
            sel.set(Dimension::Year, Some("soon")),
            Err(SelectionError::BadYear("soon".into()))
        );
        assert!(sel.year.is_any());
    }

    #[test]
    fn validate_reports_first_unknown_value() {
        let vocab = Vocabulary::from_records(&[rec()]);
        let mut sel = FilterSelection::default();
        assert!(vocab.validate(&sel).is_ok());

        sel.sex = Filter::Only("M".into());
        sel.year = Filter::Only(1999);
        assert_eq!(
            vocab.validate(&sel),
            Err(SelectionError::OutOfVocabulary {
                dimension: Dimension::Year,
                value: "1999".into(),
            })
        );
    }
}
