use std::fs;
use std::path::Path;

use geojson::{Feature, GeoJson, JsonObject};
use rayon::prelude::*;
use thiserror::Error;

use crate::shape::{Bounds, Shape};

/// Property keys tried in order for a district's display name
const NAME_KEYS: [&str; 2] = ["Dist_Name", "district"];
pub const UNKNOWN_NAME: &str = "Unknown District";

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATA_PATH: &str = "data/districts.geojson";

/// Errors that can occur while loading the district dataset.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] simd_json::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("expected a FeatureCollection")]
    NotFeatureCollection,

    #[error("no polygon districts found")]
    NoDistricts,
}

/// One named region of the map
#[derive(Clone, Debug)]
pub struct District {
    pub name: String,
    pub shape: Shape,
    /// Extent of the outer rings; `None` for a shape with no points
    pub bounds: Option<Bounds>,
}

impl District {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        let bounds = shape.bounds();
        Self {
            name: name.into(),
            shape,
            bounds,
        }
    }
}

/// Result of a successful load
#[derive(Debug)]
pub struct Dataset {
    pub districts: Vec<District>,
    /// Features without polygon geometry
    pub skipped: usize,
}

/// Load the district FeatureCollection from disk
pub fn load_districts(path: &Path) -> Result<Dataset, DataError> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_districts(&mut bytes)
}

/// Parse a FeatureCollection held in memory. The buffer is used as scratch
/// space by the JSON parser.
pub fn parse_districts(bytes: &mut [u8]) -> Result<Dataset, DataError> {
    let value: geojson::JsonValue = simd_json::serde::from_slice(bytes)?;
    let GeoJson::FeatureCollection(fc) = GeoJson::from_json_value(value)? else {
        return Err(DataError::NotFeatureCollection);
    };

    let total = fc.features.len();
    let districts: Vec<District> = fc.features.par_iter().filter_map(district_from_feature).collect();

    if districts.is_empty() {
        return Err(DataError::NoDistricts);
    }

    Ok(Dataset {
        skipped: total - districts.len(),
        districts,
    })
}

fn district_from_feature(feature: &Feature) -> Option<District> {
    let shape = Shape::from_geometry(&feature.geometry.as_ref()?.value)?;
    Some(District::new(district_name(feature.properties.as_ref()), shape))
}

/// First non-empty string among the name keys, else the unknown placeholder
pub fn district_name(props: Option<&JsonObject>) -> String {
    props
        .and_then(|p| {
            NAME_KEYS
                .iter()
                .filter_map(|key| p.get(*key).and_then(|v| v.as_str()))
                .find(|name| !name.is_empty())
        })
        .unwrap_or(UNKNOWN_NAME)
        .to_string()
}

/// Union of all district extents
pub fn dataset_bounds(districts: &[District]) -> Option<Bounds> {
    districts
        .iter()
        .filter_map(|d| d.bounds)
        .reduce(Bounds::union)
}
