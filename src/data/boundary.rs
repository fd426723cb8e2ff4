use std::path::Path;

use geo::{BoundingRect, Contains, MultiPolygon, Point, Rect};
use geojson::{Feature, GeoJson};

use super::error::{DataError, FormatIssue};

// ---------------------------------------------------------------------------
// NameKey – which property holds the county name
// ---------------------------------------------------------------------------

/// Property key carrying the county name. Boundary files in the wild use
/// either spelling; it is resolved once when the file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKey {
    /// `"NAME"` (Census TIGER style)
    Upper,
    /// `"name"`
    Lower,
}

impl NameKey {
    pub fn as_str(self) -> &'static str {
        match self {
            NameKey::Upper => "NAME",
            NameKey::Lower => "name",
        }
    }

    /// The first feature carrying either key decides; `NAME` wins a tie.
    pub fn detect(features: &[Feature]) -> Option<NameKey> {
        features.iter().find_map(|f| {
            let props = f.properties.as_ref()?;
            if props.contains_key(NameKey::Upper.as_str()) {
                Some(NameKey::Upper)
            } else if props.contains_key(NameKey::Lower.as_str()) {
                Some(NameKey::Lower)
            } else {
                None
            }
        })
    }
}

// ---------------------------------------------------------------------------
// CountyBoundaries
// ---------------------------------------------------------------------------

/// One county polygon with its display name.
#[derive(Debug, Clone)]
pub struct CountyFeature {
    pub name: String,
    pub shape: MultiPolygon<f64>,
}

impl CountyFeature {
    /// Exterior rings as `[lon, lat]` points, one per polygon part.
    pub fn outlines(&self) -> impl Iterator<Item = Vec<[f64; 2]>> + '_ {
        self.shape
            .0
            .iter()
            .map(|poly| poly.exterior().coords().map(|c| [c.x, c.y]).collect())
    }
}

/// The county boundary collection, read-only after load.
#[derive(Debug, Clone)]
pub struct CountyBoundaries {
    pub name_key: NameKey,
    pub features: Vec<CountyFeature>,
}

impl CountyBoundaries {
    /// Parse a GeoJSON `FeatureCollection` from `text`. `path` is only used
    /// for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, DataError> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e| DataError::malformed(path, format!("parsing GeoJSON: {e}")))?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            _ => {
                return Err(DataError::malformed(
                    path,
                    "expected a GeoJSON FeatureCollection",
                ))
            }
        };

        if features.is_empty() {
            return Err(DataError::format(path, FormatIssue::NoFeatures));
        }

        let name_key = NameKey::detect(&features)
            .ok_or_else(|| DataError::format(path, FormatIssue::NoNameKey))?;
        log::info!(
            "Boundary file {} names counties under '{}'",
            path.display(),
            name_key.as_str()
        );

        let total = features.len();
        let features: Vec<CountyFeature> = features
            .into_iter()
            .enumerate()
            .filter_map(|(i, f)| county_feature(f, name_key, i))
            .collect();

        if features.len() < total {
            log::warn!(
                "Skipped {} of {total} boundary features without a usable name or polygon",
                total - features.len()
            );
        }

        Ok(CountyBoundaries { name_key, features })
    }

    /// Bounding box over every county, `None` if no feature has a shape.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(|f| f.shape.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    /// The county whose polygon contains the given point.
    pub fn feature_at(&self, lon: f64, lat: f64) -> Option<&CountyFeature> {
        let point = Point::new(lon, lat);
        self.features.iter().find(|f| f.shape.contains(&point))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn county_feature(feature: Feature, key: NameKey, index: usize) -> Option<CountyFeature> {
    let name = feature
        .properties
        .as_ref()
        .and_then(|p| p.get(key.as_str()))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let Some(geometry) = feature.geometry else {
        log::debug!("Feature {index} ({name}) has no geometry");
        return None;
    };

    let shape = match geo::Geometry::<f64>::try_from(geometry) {
        Ok(geo::Geometry::MultiPolygon(mp)) => mp,
        Ok(geo::Geometry::Polygon(p)) => MultiPolygon(vec![p]),
        Ok(_) | Err(_) => {
            log::warn!("Feature {index} ({name}) is not a polygon; skipped");
            return None;
        }
    };

    Some(CountyFeature { name, shape })
}
